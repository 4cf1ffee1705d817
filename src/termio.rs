//! Terminal reporting, with colors!

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print an OK message, in green.
pub fn print_ok(msg: &str) {
    print_tagged(Color::Green, "OK   ", msg);
}

/// Print a skip notice, in cyan.
pub fn print_skip(msg: &str) {
    print_tagged(Color::Cyan, "SKIP ", msg);
}

/// Print a warning message, in yellow.
pub fn print_warn(msg: &str) {
    print_tagged(Color::Yellow, "WARN ", msg);
}

fn print_tagged(color: Color, tag: &str, msg: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    stdout
        .set_color(ColorSpec::new().set_fg(Some(color)))
        .expect("set color");
    writeln!(&mut stdout, "{} {}", tag, msg).expect("write message");

    stdout.reset().expect("reset color");
}
