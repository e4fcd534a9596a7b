//! Text dashboard for the browser host.
//!
//! Presentation only: everything here reads the engine, nothing mutates it.

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::economy::{Engine, GeneratorKind};

/// Art tier shown next to a generator, by owned count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ArtTier {
    Hidden,
    Wood,
    Stone,
    Iron,
    Gold,
    Diamond,
    Netherite,
}

impl ArtTier {
    pub fn label(&self) -> &'static str {
        match self {
            ArtTier::Hidden => "",
            ArtTier::Wood => "wood",
            ArtTier::Stone => "stone",
            ArtTier::Iron => "iron",
            ArtTier::Gold => "gold",
            ArtTier::Diamond => "diamond",
            ArtTier::Netherite => "netherite",
        }
    }

    fn color(&self) -> Color {
        match self {
            ArtTier::Hidden => Color::DarkGray,
            ArtTier::Wood => Color::Yellow,
            ArtTier::Stone => Color::Gray,
            ArtTier::Iron => Color::White,
            ArtTier::Gold => Color::LightYellow,
            ArtTier::Diamond => Color::Cyan,
            ArtTier::Netherite => Color::Magenta,
        }
    }
}

/// Minimum count for each tier, ascending.
const ART_THRESHOLDS: [(u32, ArtTier); 7] = [
    (0, ArtTier::Hidden),
    (1, ArtTier::Wood),
    (10, ArtTier::Stone),
    (25, ArtTier::Iron),
    (50, ArtTier::Gold),
    (100, ArtTier::Diamond),
    (250, ArtTier::Netherite),
];

pub fn tier_for(count: u32) -> ArtTier {
    ART_THRESHOLDS
        .iter()
        .rev()
        .find(|(min, _)| count >= *min)
        .map_or(ArtTier::Hidden, |(_, tier)| *tier)
}

/// Format a whole quantity with thousands separators; scientific past 1e15.
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    if n >= 1e15 {
        return format!("{:.3e}", n);
    }
    let s = (n.floor() as u64).to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// A rate with one decimal place.
pub fn format_rate(n: f64) -> String {
    let tenths = (n * 10.0).round();
    let whole = (tenths / 10.0).floor();
    let digit = (tenths - whole * 10.0) as u8;
    format!("{}.{}", format_number(whole), digit)
}

/// Host-side status the engine does not own.
pub struct Hud<'a> {
    pub message: &'a str,
    /// Text typed so far while entering a promo code.
    pub promo_input: Option<&'a str>,
    /// Shop keys buy as many as affordable instead of one.
    pub buy_max: bool,
}

fn stats_rows(engine: &Engine) -> Vec<String> {
    vec![
        format!("Emeralds     {}", format_number(engine.balance())),
        format!("Lifetime     {}", format_number(engine.lifetime_earned())),
        format!("Per second   {}", format_rate(engine.passive_rate())),
        format!("Per click    {}", format_rate(engine.click_value())),
        format!("Lucky click  {:.0}%", engine.lucky_chance() * 100.0),
        format!(
            "Clicks       {} ({} lucky)",
            format_number(engine.total_clicks() as f64),
            format_number(engine.lucky_clicks() as f64)
        ),
    ]
}

fn shop_rows(engine: &Engine) -> Vec<(String, ArtTier, bool)> {
    GeneratorKind::all()
        .iter()
        .map(|kind| {
            if *kind == GeneratorKind::EnchantedAutoClick {
                let row = match engine.next_enchant_tier() {
                    Some(next) if engine.count(GeneratorKind::AutoClicker) < next.required_auto_clickers => {
                        format!(
                            "[{}] {:<20} x{:<5} locked: {} Auto Clickers",
                            kind.key(),
                            kind.name(),
                            engine.multi_auto_click_power(),
                            next.required_auto_clickers
                        )
                    }
                    Some(next) => format!(
                        "[{}] {:<20} x{:<5} -> x{} for {}",
                        kind.key(),
                        kind.name(),
                        engine.multi_auto_click_power(),
                        next.power,
                        format_number(next.cost)
                    ),
                    None => format!(
                        "[{}] {:<20} x{:<5} max",
                        kind.key(),
                        kind.name(),
                        engine.multi_auto_click_power()
                    ),
                };
                let affordable = engine
                    .next_enchant_tier()
                    .is_some_and(|next| next.cost <= engine.balance());
                // One art tier per enchant tier.
                let tier = ART_THRESHOLDS[engine.enchant_tier().min(ART_THRESHOLDS.len() - 1)].1;
                return (row, tier, affordable);
            }

            let count = engine.count(*kind);
            let cost = engine.next_unit_cost(*kind);
            let capped = kind.cap().is_some_and(|cap| count >= cap);
            let price = if capped { "max".to_string() } else { format_number(cost) };
            let row = format!("[{}] {:<20} {:>6}  {:>12}", kind.key(), kind.name(), count, price);
            (row, tier_for(count), !capped && cost <= engine.balance())
        })
        .collect()
}

pub fn render(f: &mut Frame, engine: &Engine, hud: &Hud, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "Allay Clicker",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(ratzilla::ratatui::layout::Alignment::Center);
    f.render_widget(title, chunks[0]);

    let stats: Vec<Line> = stats_rows(engine).into_iter().map(Line::from).collect();
    let stats = Paragraph::new(stats).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Stats "),
    );
    f.render_widget(stats, chunks[1]);

    let shop: Vec<Line> = shop_rows(engine)
        .into_iter()
        .map(|(row, tier, affordable)| {
            let style = if affordable {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(vec![
                Span::styled(row, style),
                Span::styled(format!(" {}", tier.label()), Style::default().fg(tier.color())),
            ])
        })
        .collect();
    let shop = Paragraph::new(shop).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(if hud.buy_max { " Shop (buying max, [M] toggles) " } else { " Shop (buying 1, [M] toggles) " }),
    );
    f.render_widget(shop, chunks[2]);

    let footer = match hud.promo_input {
        Some(input) => format!("Promo code: {}_   [Enter] apply  [Esc] cancel", input),
        None if hud.message.is_empty() => "[C] click  [P] promo code".to_string(),
        None => format!("{}   [C] click  [P] promo code", hud.message),
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        footer,
        Style::default().fg(Color::Gray),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .wrap(Wrap { trim: false });
    f.render_widget(footer, chunks[3]);
}
