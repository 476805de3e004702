// Binary entry point; all logic lives in the library's cli module.

fn main() {
    synrules::cli::run();
}
