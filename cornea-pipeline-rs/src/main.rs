fn main() {
    cornea_pipeline::cli::run();
}
