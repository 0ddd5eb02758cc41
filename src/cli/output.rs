//! Colored terminal output
//!
//! `colored` honors NO_COLOR and CLICOLOR_FORCE. Diagnostics go to stderr,
//! rendered trees and listings to stdout.

use std::fmt::Display;

use colored::Colorize;

pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow().bold(), msg);
}

/// Grafted mount point or successful step.
pub fn resolved(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Mount point still showing its placeholder.
pub fn unresolved(msg: &(impl Display + ?Sized)) {
    println!("  {} {}", "○".yellow(), msg);
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}

pub fn plain(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
