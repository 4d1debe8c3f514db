use kamin_lisp::cmdline;

fn main() {
    pretty_env_logger::init();
    match cmdline::launch(std::env::args_os()) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(cmdline::Error::Usage(e)) => e.exit(),
        Err(e) => {
            cmdline::report(&"kamin", &e);
            std::process::exit(1);
        }
    }
}
