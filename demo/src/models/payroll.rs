/// Internal bookkeeping. No `RestEntity` derive, so no repository is
/// generated and nothing is exposed.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Payroll {
    pub period: String,
    pub total_cents: i64,
}
