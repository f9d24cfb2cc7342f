fn main() {
    restrepo_build::generate_repositories()
        .base_module("models")
        .run()
        .expect("failed to generate repositories");
}
