use crate::ui::{palette, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::BOX, text.style(palette().title));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(palette().done));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(palette().failed));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(palette().caution));
}

pub fn item_new(uri: &str) {
    println!("{} {}", Icons::NEW.style(palette().done), uri);
}

pub fn item_updated(uri: &str) {
    println!("{} {}", Icons::MOD.style(palette().caution), uri);
}

pub fn item_deleted(uri: &str) {
    println!("{} {}", Icons::DEL.style(palette().failed), uri);
}

/// Indented `label value` line under a header
pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(palette().label), value);
}
