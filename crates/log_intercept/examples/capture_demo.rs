//! Start capture, print to both streams, stop, then show what was observed.
//!
//! The printed lines still appear on the console — capture tees every byte
//! back to the original destination.

use std::sync::{Arc, Mutex};

use log_intercept::LogInterceptor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let interceptor = LogInterceptor::new(move |line: &str| {
        sink.lock().unwrap().push(line.to_string());
    });

    interceptor.start()?;
    println!("a message to stdout");
    println!("another one with a number: {}", 42);
    eprintln!("a message to stderr");
    interceptor.stop();

    for line in seen.lock().unwrap().iter() {
        println!("observed: {line}");
    }
    Ok(())
}
