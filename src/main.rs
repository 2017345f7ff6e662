fn main() {
    if let Err(err) = prereq_tree::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
