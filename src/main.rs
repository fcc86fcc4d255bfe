fn main() {
    csrf_cookie::cli::run();
}
