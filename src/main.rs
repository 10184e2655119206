// ABOUTME: Entry point for the db-bootstrap utility
// ABOUTME: Calls the library run function, which handles every error itself

fn main() {
    db_bootstrap_lib::run();
}
