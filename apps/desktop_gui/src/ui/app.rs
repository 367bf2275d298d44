use std::time::Duration;

use client_core::{ClientError, SessionState};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::{Difficulty, MessageRole, Mode};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent,
    orchestration::dispatch_backend_command,
    reducer::{apply_ui_event, ShellStatus},
};

const LEFT_PANEL_WIDTH: f32 = 320.0;
const QUESTION_HINT: &str = "Ask: Explain cardiac action potential from my notes… (Ctrl+Enter to send)";
const ANSWER_HINT: &str = "(Grade mode) Paste your answer here…";
const MODEL_HINT: &str = "Example: llama3.1:8b or gemma2:2b";

pub struct StartupConfig {
    pub api_base: String,
    pub model: String,
}

pub struct StudyGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    api_base: String,
    session: SessionState,
    shell: ShellStatus,
}

impl StudyGuiApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        config: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            api_base: config.api_base,
            session: SessionState::with_model(config.model),
            shell: ShellStatus {
                backend: "Backend worker starting...".to_string(),
                banner: None,
            },
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            apply_ui_event(&mut self.session, &mut self.shell, event);
        }
    }

    fn queue(&mut self, cmd: BackendCommand) -> Result<(), ClientError> {
        dispatch_backend_command(&self.cmd_tx, cmd).map_err(|error| {
            let refused = ClientError::Refused(error.message().to_string());
            self.shell.backend = error.headline().to_string();
            self.shell.banner = Some(error);
            refused
        })
    }

    fn pick_and_upload(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .pick_file()
        else {
            return;
        };
        self.session.begin_upload();
        if let Err(err) = self.queue(BackendCommand::Upload { path }) {
            self.session.settle_upload(Err(err));
        }
    }

    fn request_ingest(&mut self) {
        self.session.begin_ingest();
        if let Err(err) = self.queue(BackendCommand::Ingest) {
            self.session.settle_ingest(Err(err));
        }
    }

    fn try_send(&mut self) {
        let Some(request) = self.session.begin_send() else {
            return;
        };
        if let Err(err) = self.queue(BackendCommand::Chat { request }) {
            self.session.settle_send(Err(err));
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.shell.banner.clone() else {
            return;
        };

        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(111, 53, 53))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        egui::RichText::new(format!("{} {}", banner.headline(), banner.message()))
                            .color(egui::Color32::WHITE),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.shell.banner = None;
                        }
                    });
                });
            });
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Med Study Assistant");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(&self.shell.backend);
                    ui.small(format!("Service: {}", self.api_base));
                });
            });
            ui.label(
                egui::RichText::new("Upload notes, ingest them, then study with cited answers")
                    .weak(),
            );
            self.show_status_banner(ui);
            ui.add_space(4.0);
        });
    }

    fn show_study_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("study_panel")
            .resizable(true)
            .default_width(LEFT_PANEL_WIDTH)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        self.show_documents_section(ui);
                        ui.separator();
                        self.show_settings_section(ui);
                        ui.separator();
                        self.show_citations_section(ui);
                    });
            });
    }

    fn show_documents_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Documents");
        ui.horizontal(|ui| {
            if ui.button("Upload PDF…").clicked() {
                self.pick_and_upload();
            }
            if ui.button("Ingest PDFs").clicked() {
                self.request_ingest();
            }
            if ui.button("Check backend").clicked() {
                // Health failures are reported through the banner, not the session.
                let _ = self.queue(BackendCommand::Health);
            }
        });
        if !self.session.upload_status().is_empty() {
            ui.label(self.session.upload_status());
        }
    }

    fn show_settings_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Study Mode");
        let mut mode = self.session.mode();
        egui::ComboBox::from_id_salt("study_mode")
            .selected_text(mode.label())
            .show_ui(ui, |ui| {
                for option in Mode::ALL {
                    ui.selectable_value(&mut mode, *option, option.label());
                }
            });
        if mode != self.session.mode() {
            self.session.set_mode(mode);
        }

        ui.heading("Quiz Difficulty");
        let mut difficulty = self.session.difficulty();
        egui::ComboBox::from_id_salt("quiz_difficulty")
            .selected_text(difficulty.as_str())
            .show_ui(ui, |ui| {
                for option in Difficulty::ALL {
                    ui.selectable_value(&mut difficulty, *option, option.as_str());
                }
            });
        if difficulty != self.session.difficulty() {
            self.session.set_difficulty(difficulty);
        }

        ui.heading("Model");
        ui.add(
            egui::TextEdit::singleline(self.session.model_mut())
                .hint_text("llama3.1:8b")
                .desired_width(f32::INFINITY),
        );
        ui.small(MODEL_HINT);
    }

    fn show_citations_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Citations");
        let citations = self.session.citations();
        if citations.is_empty() {
            ui.label(egui::RichText::new("No citations yet.").weak());
            return;
        }
        for citation in citations {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.strong(citation.title());
                ui.label(egui::RichText::new(&citation.snippet).small());
            });
        }
    }

    fn show_composer(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("composer").show(ctx, |ui| {
            ui.add_space(6.0);
            let question = ui.add(
                egui::TextEdit::multiline(self.session.question_mut())
                    .id_salt("composer_question")
                    .desired_rows(3)
                    .desired_width(f32::INFINITY)
                    .hint_text(QUESTION_HINT),
            );

            if self.session.shows_answer_box() {
                ui.add(
                    egui::TextEdit::multiline(self.session.user_answer_mut())
                        .id_salt("composer_answer")
                        .desired_rows(3)
                        .desired_width(f32::INFINITY)
                        .hint_text(ANSWER_HINT),
                );
            }

            let send_shortcut = question.has_focus()
                && ui.input(|i| i.key_pressed(egui::Key::Enter) && i.modifiers.command);
            let clicked_send = ui.button("Send").clicked();
            if send_shortcut || clicked_send {
                self.try_send();
            }
            ui.add_space(6.0);
        });
    }

    fn show_messages(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for message in self.session.messages() {
                        let (fill, layout) = match message.role {
                            MessageRole::User => (
                                ui.visuals().selection.bg_fill.gamma_multiply(0.35),
                                egui::Layout::right_to_left(egui::Align::TOP),
                            ),
                            MessageRole::Assistant => (
                                ui.visuals().faint_bg_color,
                                egui::Layout::left_to_right(egui::Align::TOP),
                            ),
                        };
                        ui.with_layout(layout, |ui| {
                            egui::Frame::NONE
                                .fill(fill)
                                .corner_radius(8.0)
                                .inner_margin(egui::Margin::symmetric(10, 8))
                                .show(ui, |ui| {
                                    ui.set_max_width(ui.available_width() * 0.8);
                                    ui.vertical(|ui| {
                                        ui.horizontal(|ui| {
                                            ui.strong(message.role.label());
                                            ui.small(
                                                message
                                                    .sent_at
                                                    .with_timezone(&chrono::Local)
                                                    .format("%H:%M")
                                                    .to_string(),
                                            );
                                        });
                                        ui.label(
                                            egui::RichText::new(&message.text).monospace(),
                                        );
                                    });
                                });
                        });
                        ui.add_space(6.0);
                    }
                });
        });
    }
}

impl eframe::App for StudyGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_header(ctx);
        self.show_study_panel(ctx);
        self.show_composer(ctx);
        self.show_messages(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::session::CHAT_FAILURE_MESSAGE;
    use crossbeam_channel::bounded;
    use shared::{
        domain::{Citation, PageRef},
        protocol::ChatResponse,
    };

    fn app_without_worker() -> StudyGuiApp {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (_ui_tx, ui_rx) = bounded(4);
        drop(cmd_rx);
        StudyGuiApp::new(
            cmd_tx,
            ui_rx,
            StartupConfig {
                api_base: "http://127.0.0.1:8000".to_string(),
                model: "llama3.1:8b".to_string(),
            },
        )
    }

    #[test]
    fn unqueued_question_still_gets_one_reply() {
        let mut app = app_without_worker();
        let earlier = vec![Citation {
            source: "cardio.pdf".to_string(),
            page: PageRef::Number(2),
            snippet: "SA node".to_string(),
        }];
        app.session.set_question("warm-up");
        app.session.begin_send().expect("warm-up");
        app.session.settle_send(Ok(ChatResponse {
            answer: "warm-up answer".to_string(),
            citations: Some(earlier.clone()),
            mode: None,
        }));

        app.session.set_question("  What sets heart rate?  ");
        app.try_send();

        let texts: Vec<&str> = app.session.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts,
            ["warm-up", "warm-up answer", "What sets heart rate?", CHAT_FAILURE_MESSAGE]
        );
        assert_eq!(app.session.citations(), earlier.as_slice());
        assert_eq!(app.session.question(), "");
        assert!(app.shell.banner.is_some());
    }

    #[test]
    fn unqueued_ingest_settles_as_failure() {
        let mut app = app_without_worker();

        app.request_ingest();

        assert!(
            app.session
                .upload_status()
                .starts_with("Ingest failed: Backend command processor disconnected"),
            "unexpected status: {}",
            app.session.upload_status()
        );
        assert_eq!(app.shell.backend, "Request could not be queued; please retry.");
    }

    #[test]
    fn blank_question_is_not_queued() {
        let mut app = app_without_worker();
        app.session.set_question("   ");

        app.try_send();

        assert!(app.session.messages().is_empty());
        assert!(app.shell.banner.is_none());
    }
}
