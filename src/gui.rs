#![windows_subsystem = "windows"]

use collatz_viz::{input, logging, render, Config, Generator, RangeReport, Sequence};
use eframe::egui;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Instant;

fn main() -> eframe::Result<()> {
    logging::init_logging(false);
    let config = match Config::load_or_default(None) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("{}; using defaults", e);
            Config::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_title("Collatz Conjecture Visualizer"),
        ..Default::default()
    };
    eframe::run_native(
        "collatz-viz",
        options,
        Box::new(move |_cc| Ok(Box::new(CollatzApp::new(&config)))),
    )
}

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 50, 50);
const ACCENT: egui::Color32 = egui::Color32::from_rgb(46, 134, 171);
const PALETTE: [egui::Color32; 10] = [
    egui::Color32::from_rgb(31, 119, 180),
    egui::Color32::from_rgb(255, 127, 14),
    egui::Color32::from_rgb(44, 160, 44),
    egui::Color32::from_rgb(214, 39, 40),
    egui::Color32::from_rgb(148, 103, 189),
    egui::Color32::from_rgb(140, 86, 75),
    egui::Color32::from_rgb(227, 119, 194),
    egui::Color32::from_rgb(127, 127, 127),
    egui::Color32::from_rgb(188, 189, 34),
    egui::Color32::from_rgb(23, 190, 207),
];

// ─── データ構造 ─────────────────────────────────────

#[derive(PartialEq, Clone, Copy)]
enum Tab {
    Single,
    Multiple,
    StoppingTimes,
    MaxValues,
    Text,
    About,
}

/// バックグラウンドで実行する範囲解析の状態
#[derive(Default)]
struct RangeJob {
    running: bool,
    elapsed_ms: u128,
    result: Option<Result<RangeReport, String>>,
}

fn lock(job: &Mutex<RangeJob>) -> MutexGuard<'_, RangeJob> {
    job.lock().unwrap_or_else(|e| e.into_inner())
}

struct CollatzApp {
    tab: Tab,
    generator: Generator,
    // 単一軌道
    single_input: String,
    single: Option<Result<Sequence, String>>,
    // 複数軌道
    multiple_input: String,
    log_scale: bool,
    multiple: Option<Result<Vec<Sequence>, String>>,
    // 停止時間 / 最大値
    stopping_input: String,
    stopping_job: Arc<Mutex<RangeJob>>,
    max_values_input: String,
    max_values_job: Arc<Mutex<RangeJob>>,
    // テキスト表示
    text_input: String,
    text: Option<Result<String, String>>,
}

impl CollatzApp {
    fn new(config: &Config) -> Self {
        let default_max_n = config.range.default_max_n.to_string();
        Self {
            tab: Tab::Single,
            generator: config.generator(),
            single_input: "27".to_string(),
            single: None,
            multiple_input: "7,15,27".to_string(),
            log_scale: config.display.log_scale,
            multiple: None,
            stopping_input: default_max_n.clone(),
            stopping_job: Arc::new(Mutex::new(RangeJob::default())),
            max_values_input: default_max_n,
            max_values_job: Arc::new(Mutex::new(RangeJob::default())),
            text_input: "7".to_string(),
            text: None,
        }
    }
}

impl eframe::App for CollatzApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if lock(&self.stopping_job).running || lock(&self.max_values_job).running {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(egui::RichText::new("Collatz 3x+1").color(ACCENT).strong());
                ui.separator();
                ui.selectable_value(&mut self.tab, Tab::Single, "Single Sequence");
                ui.selectable_value(&mut self.tab, Tab::Multiple, "Multiple Sequences");
                ui.selectable_value(&mut self.tab, Tab::StoppingTimes, "Stopping Times");
                ui.selectable_value(&mut self.tab, Tab::MaxValues, "Maximum Values");
                ui.selectable_value(&mut self.tab, Tab::Text, "View Sequence (Text)");
                ui.selectable_value(&mut self.tab, Tab::About, "About");
                if let Some(limit) = self.generator.max_steps() {
                    ui.separator();
                    ui.colored_label(egui::Color32::GRAY, format!("max_steps = {}", limit));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Single => self.ui_single(ui),
            Tab::Multiple => self.ui_multiple(ui),
            Tab::StoppingTimes => self.ui_stopping_times(ui),
            Tab::MaxValues => self.ui_max_values(ui),
            Tab::Text => self.ui_text(ui),
            Tab::About => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.monospace(render::ABOUT);
                });
            }
        });
    }
}

/// 入力欄 + ボタン。ボタン押下か Enter で true。
fn input_row(ui: &mut egui::Ui, label: &str, value: &mut String, button: &str, enabled: bool) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let resp = ui.add(egui::TextEdit::singleline(value).desired_width(200.0));
        let entered = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let clicked = ui.add_enabled(enabled, egui::Button::new(button)).clicked();
        enabled && (entered || clicked)
    })
    .inner
}

fn show_error(ui: &mut egui::Ui, message: &str) {
    ui.colored_label(ERROR_COLOR, format!("Error: {}", message));
}

fn sequence_points(seq: &Sequence, log_scale: bool) -> PlotPoints {
    seq.iter()
        .enumerate()
        .map(|(i, v)| {
            let y = if log_scale { render::log10(v) } else { render::plot_value(v) };
            [i as f64, y]
        })
        .collect()
}

impl CollatzApp {
    // ─── 単一軌道 ──────────────────────────────
    fn ui_single(&mut self, ui: &mut egui::Ui) {
        if input_row(ui, "Enter starting number:", &mut self.single_input, "Visualize", true) {
            self.single = Some(
                input::parse_positive(&self.single_input)
                    .and_then(|n| self.generator.generate_from(&n))
                    .map_err(|e| e.to_string()),
            );
        }
        ui.separator();

        match &self.single {
            Some(Ok(seq)) => {
                ui.label(egui::RichText::new(render::sequence_title(seq)).strong());
                Plot::new("single_plot")
                    .x_axis_label("Step Number")
                    .y_axis_label("Value")
                    .show(ui, |plot_ui| {
                        let points = sequence_points(seq, false);
                        plot_ui.line(Line::new(points).color(ACCENT).width(2.0));
                        plot_ui.points(
                            Points::new(sequence_points(seq, false))
                                .radius(2.5)
                                .color(egui::Color32::from_rgb(162, 59, 114)),
                        );
                    });
            }
            Some(Err(e)) => show_error(ui, e),
            None => {}
        }
    }

    // ─── 複数軌道 ──────────────────────────────
    fn ui_multiple(&mut self, ui: &mut egui::Ui) {
        ui.colored_label(egui::Color32::GRAY, "(e.g., 7,15,27)");
        let go = input_row(
            ui,
            "Enter numbers separated by commas:",
            &mut self.multiple_input,
            "Visualize",
            true,
        );
        ui.horizontal(|ui| {
            ui.label("Scale:");
            ui.radio_value(&mut self.log_scale, false, "Normal Scale");
            ui.radio_value(&mut self.log_scale, true, "Logarithmic Scale");
        });
        if go {
            self.multiple = Some(
                input::parse_integer_list(&self.multiple_input)
                    .and_then(|starts| self.generator.generate_multiple(starts))
                    .map(|seqs| seqs.into_iter().map(|(_, seq)| seq).collect())
                    .map_err(|e| e.to_string()),
            );
        }
        ui.separator();

        match &self.multiple {
            Some(Ok(seqs)) => {
                let log_scale = self.log_scale;
                ui.label(egui::RichText::new("Collatz Conjecture - Multiple Sequences").strong());
                Plot::new("multiple_plot")
                    .legend(Legend::default())
                    .x_axis_label("Step Number")
                    .y_axis_label(if log_scale { "Value (log10)" } else { "Value" })
                    .show(ui, |plot_ui| {
                        for (i, seq) in seqs.iter().enumerate() {
                            plot_ui.line(
                                Line::new(sequence_points(seq, log_scale))
                                    .name(format!("Start: {}", render::abbreviate(seq.start())))
                                    .color(PALETTE[i % PALETTE.len()])
                                    .width(2.0),
                            );
                        }
                    });
            }
            Some(Err(e)) => show_error(ui, e),
            None => {}
        }
    }

    // ─── 停止時間 ──────────────────────────────
    fn ui_stopping_times(&mut self, ui: &mut egui::Ui) {
        let running = lock(&self.stopping_job).running;
        if input_row(ui, "Analyze numbers from 1 to:", &mut self.stopping_input, "Analyze", !running) {
            start_range_job(self.generator, &self.stopping_input, &self.stopping_job);
        }
        ui.separator();

        let job = lock(&self.stopping_job);
        if job.running {
            ui.spinner();
            return;
        }
        match &job.result {
            Some(Ok(report)) => {
                ui.label(egui::RichText::new(render::stopping_times_title(report)).strong());
                ui.colored_label(egui::Color32::GRAY, format!("{} ms", job.elapsed_ms));
                let bars: Vec<Bar> = report
                    .stopping_times()
                    .map(|(n, steps)| Bar::new(n as f64, steps as f64))
                    .collect();
                Plot::new("stopping_plot")
                    .x_axis_label("Starting Number")
                    .y_axis_label("Steps to Reach 1")
                    .show(ui, |plot_ui| {
                        plot_ui.bar_chart(
                            BarChart::new(bars)
                                .width(1.0)
                                .color(egui::Color32::from_rgb(70, 130, 180)),
                        );
                    });
            }
            Some(Err(e)) => show_error(ui, e),
            None => {}
        }
    }

    // ─── 最大値 ──────────────────────────────
    fn ui_max_values(&mut self, ui: &mut egui::Ui) {
        let running = lock(&self.max_values_job).running;
        if input_row(ui, "Analyze numbers from 1 to:", &mut self.max_values_input, "Analyze", !running) {
            start_range_job(self.generator, &self.max_values_input, &self.max_values_job);
        }
        ui.separator();

        let job = lock(&self.max_values_job);
        if job.running {
            ui.spinner();
            return;
        }
        match &job.result {
            Some(Ok(report)) => {
                ui.label(egui::RichText::new(render::max_values_title(report)).strong());
                ui.colored_label(egui::Color32::GRAY, format!("{} ms", job.elapsed_ms));
                let points: PlotPoints = report
                    .peaks()
                    .map(|(n, peak)| [n as f64, render::plot_value(peak)])
                    .collect();
                Plot::new("max_values_plot")
                    .x_axis_label("Starting Number")
                    .y_axis_label("Maximum Value Reached")
                    .show(ui, |plot_ui| {
                        plot_ui.points(Points::new(points).radius(3.0).color(ACCENT));
                    });
            }
            Some(Err(e)) => show_error(ui, e),
            None => {}
        }
    }

    // ─── テキスト表示 ──────────────────────────────
    fn ui_text(&mut self, ui: &mut egui::Ui) {
        if input_row(ui, "Enter starting number:", &mut self.text_input, "Show Sequence", true) {
            self.text = Some(
                input::parse_positive(&self.text_input)
                    .and_then(|n| self.generator.generate_from(&n))
                    .map(|seq| render::sequence_listing(&seq))
                    .map_err(|e| e.to_string()),
            );
        }
        ui.separator();

        match &self.text {
            Some(Ok(listing)) => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.monospace(listing.as_str());
                });
            }
            Some(Err(e)) => show_error(ui, e),
            None => {}
        }
    }
}

/// 範囲解析を別スレッドで実行し、結果を job に書き戻す
fn start_range_job(generator: Generator, max_n: &str, job: &Arc<Mutex<RangeJob>>) {
    let max_n = match input::parse_integer(max_n) {
        Ok(n) => n,
        Err(e) => {
            lock(job).result = Some(Err(e.to_string()));
            return;
        }
    };
    {
        let mut j = lock(job);
        j.running = true;
        j.result = None;
    }
    let job = Arc::clone(job);

    thread::spawn(move || {
        // パニック時も running = false を保証するガード
        struct RunGuard(Arc<Mutex<RangeJob>>);
        impl Drop for RunGuard {
            fn drop(&mut self) {
                lock(&self.0).running = false;
            }
        }
        let _guard = RunGuard(Arc::clone(&job));

        let timer = Instant::now();
        let result = generator.analyze_range(max_n).map_err(|e| e.to_string());
        let elapsed_ms = timer.elapsed().as_millis();
        if let Err(ref e) = result {
            tracing::warn!("range analysis failed: {}", e);
        }

        let mut j = lock(&job);
        j.running = false;
        j.elapsed_ms = elapsed_ms;
        j.result = Some(result);
    });
}
