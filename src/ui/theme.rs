//! Terminal palette for catalog output

use crate::contract::PriceTier;
use owo_colors::Style;
use std::ffi::OsStr;
use std::sync::OnceLock;

static PALETTE: OnceLock<Palette> = OnceLock::new();

/// Styles keyed by what is being shown: status lines, field labels,
/// price tiers and stock levels
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub title: Style,
    pub done: Style,
    pub failed: Style,
    pub caution: Style,
    pub label: Style,
    low_tier: Style,
    middle_tier: Style,
    high_tier: Style,
    in_stock: Style,
    sold_out: Style,
}

impl Palette {
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR");
        if wants_color(no_color.as_deref(), console::Term::stdout().is_term()) {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn colored() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            done: Style::new().green().bold(),
            failed: Style::new().red().bold(),
            caution: Style::new().yellow(),
            label: Style::new().dimmed(),
            low_tier: Style::new().green(),
            middle_tier: Style::new().yellow(),
            high_tier: Style::new().magenta().bold(),
            in_stock: Style::new(),
            sold_out: Style::new().red(),
        }
    }

    pub fn plain() -> Self {
        let none = Style::new();
        Self {
            title: none,
            done: none,
            failed: none,
            caution: none,
            label: none,
            low_tier: none,
            middle_tier: none,
            high_tier: none,
            in_stock: none,
            sold_out: none,
        }
    }

    pub fn tier(&self, tier: PriceTier) -> Style {
        match tier {
            PriceTier::Low => self.low_tier,
            PriceTier::Middle => self.middle_tier,
            PriceTier::High => self.high_tier,
        }
    }

    /// Zero units stands out; anything else is printed as is
    pub fn stock(&self, amount: i64) -> Style {
        if amount == 0 { self.sold_out } else { self.in_stock }
    }
}

/// Color only on a terminal, and never when `NO_COLOR` is set to something
fn wants_color(no_color: Option<&OsStr>, is_term: bool) -> bool {
    let disabled = no_color.is_some_and(|v| !v.is_empty());
    is_term && !disabled
}

pub fn palette() -> &'static Palette {
    PALETTE.get_or_init(Palette::detect)
}
