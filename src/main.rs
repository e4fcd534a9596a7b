mod economy;
mod logging;
mod render;
mod time;

use std::{cell::RefCell, io, rc::Rc};

use economy::config::AUTOSAVE_INTERVAL;
use economy::{Engine, EngineConfig, GeneratorKind, OfflineReport, TierAdvance};
use ratzilla::event::KeyCode;
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use render::{format_number, Hud};
use time::GameClock;

fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// エンジンを包むホスト側の状態 (フレーム時計、オートセーブ、UI 表示)。
struct App {
    engine: Engine,
    clock: GameClock,
    ticks_since_save: u32,
    message: String,
    promo_input: Option<String>,
    buy_max: bool,
}

impl App {
    fn new(engine: Engine, startup: OfflineReport) -> Self {
        // オフライン精算の閾値未満の空白はフレーム側で全額払う
        let max_gap_ms = engine.config().offline_min_seconds as f64 * 1000.0;
        let mut app = Self {
            engine,
            clock: GameClock::new(max_gap_ms),
            ticks_since_save: 0,
            message: String::new(),
            promo_input: None,
            buy_max: false,
        };
        app.report_offline(startup);
        app
    }

    fn report_offline(&mut self, report: OfflineReport) {
        if report.earned > 0.0 {
            self.message = format!(
                "Welcome back! +{} emeralds over {}s away",
                format_number(report.earned),
                report.seconds_away
            );
        }
    }

    /// 1 フレーム分の進行。
    ///
    /// オフライン閾値以上の空白はまず精算し、tick 時計を resync して二重払いを防ぐ。
    /// 閾値未満の空白 (スロットリングされたタブなど) は GameClock が全額 tick にする。
    fn advance(&mut self, now: f64) {
        let report = self.engine.reconcile_offline_progress(now as u64);
        if report.seconds_away > 0 {
            self.clock.resync(now);
            self.report_offline(report);
        }

        let ticks = self.clock.update(now);
        if ticks == 0 {
            return;
        }
        self.engine.tick(ticks as f64 * time::TICK_MS / 1000.0);
        self.ticks_since_save += ticks;
        if self.ticks_since_save >= AUTOSAVE_INTERVAL {
            self.ticks_since_save = 0;
            self.persist(now);
        }
    }

    fn persist(&mut self, now: f64) {
        self.engine.update_last_visit_time(now as u64);
        #[cfg(target_arch = "wasm32")]
        economy::save::save_game(&self.engine);
    }

    fn handle_key(&mut self, code: KeyCode) {
        if let Some(input) = self.promo_input.as_mut() {
            match code {
                KeyCode::Char(c) => input.push(c),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Enter => {
                    let code = self.promo_input.take().unwrap_or_default();
                    let result = self.engine.apply_promo_code(&code);
                    self.message = result.message;
                }
                KeyCode::Esc => self.promo_input = None,
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Char('c') | KeyCode::Char(' ') => {
                let value = self.engine.register_click();
                if value > self.engine.click_value() {
                    self.message = format!("Lucky click! +{}", format_number(value));
                }
            }
            KeyCode::Char('p') => self.promo_input = Some(String::new()),
            KeyCode::Char('m') => self.buy_max = !self.buy_max,
            KeyCode::Char('e') => {
                self.message = match self.engine.advance_enchanted_tier() {
                    TierAdvance::Advanced { power } => format!("Auto Clickers enchanted to x{power}"),
                    TierAdvance::Locked { required, owned } => {
                        format!("Locked: needs {required} Auto Clickers (have {owned})")
                    }
                    TierAdvance::InsufficientFunds { cost } => {
                        format!("Need {} emeralds", format_number(cost))
                    }
                    TierAdvance::Maxed => "Enchantment is maxed".to_string(),
                };
            }
            KeyCode::Char(c) => {
                let Some(kind) = GeneratorKind::counted().iter().find(|k| k.key() == c) else {
                    return;
                };
                let bought = if self.buy_max {
                    self.engine.purchase_max(*kind)
                } else if self.engine.purchase(*kind, 1) {
                    1
                } else {
                    0
                };
                self.message = if bought > 0 {
                    format!("Bought {} {}", bought, kind.name())
                } else {
                    format!("Can't buy {}", kind.name())
                };
            }
            _ => {}
        }
    }
}

/// ページが非表示/破棄されるときに訪問時刻を記録してセーブする。
#[cfg(target_arch = "wasm32")]
fn install_pagehide_hook(app: Rc<RefCell<App>>) {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    let Some(window) = web_sys::window() else {
        return;
    };
    let on_hide = Closure::<dyn FnMut()>::new(move || {
        app.borrow_mut().persist(now_ms());
    });
    if window
        .add_event_listener_with_callback("pagehide", on_hide.as_ref().unchecked_ref())
        .is_err()
    {
        web_sys::console::warn_1(&"allay-clicker: pagehide hook not installed".into());
    }
    on_hide.forget();
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logging::init();

    let now = now_ms();
    let mut engine = Engine::new(EngineConfig::with_seed(now as u64));
    #[cfg(target_arch = "wasm32")]
    economy::save::load_game(&mut engine);
    // 最初の tick より先にオフライン収入を精算する
    let startup = engine.reconcile_offline_progress(now as u64);

    let app = Rc::new(RefCell::new(App::new(engine, startup)));
    #[cfg(target_arch = "wasm32")]
    install_pagehide_hook(app.clone());

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let app = app.clone();
        move |key_event| {
            app.borrow_mut().handle_key(key_event.code);
        }
    });

    terminal.draw_web(move |f| {
        let area = f.area();
        let mut app = app.borrow_mut();
        app.advance(now_ms());
        let hud = Hud {
            message: &app.message,
            promo_input: app.promo_input.as_deref(),
            buy_max: app.buy_max,
        };
        render::render(f, &app.engine, &hud, area);
    });

    Ok(())
}
