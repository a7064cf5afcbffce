//! Toast notification system: transient status messages.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS, C_TOAST_WARNING};
use crate::widgets::text;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Warning => "!",
            Self::Error => "✗",
        }
    }

    fn color(self) -> ratatui::style::Color {
        match self {
            Self::Success => C_TOAST_SUCCESS,
            Self::Warning => C_TOAST_WARNING,
            Self::Error => C_TOAST_ERROR,
        }
    }
}

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

/// A persistent spinner toast that animates until dismissed.
struct SpinnerToast {
    message: String,
    frame: usize,
}

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub struct ToastManager {
    toasts: VecDeque<Toast>,
    spinner: Option<SpinnerToast>,
    max_visible: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
            spinner: None,
            max_visible: 3,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, duration: Duration) {
        let msg = message.into();
        self.toasts.retain(|t| t.message != msg);
        self.toasts.push_back(Toast {
            message: msg,
            severity,
            expires: Instant::now() + duration,
        });
        while self.toasts.len() > self.max_visible * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success, Duration::from_secs(3));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Warning, Duration::from_secs(4));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error, Duration::from_secs(5));
    }

    /// Start or replace the spinner. It animates on every `tick()` and stays
    /// until `dismiss_spinner`.
    pub fn spinner(&mut self, message: impl Into<String>) {
        let message = message.into();
        match self.spinner.as_mut() {
            Some(s) => s.message = message,
            None => self.spinner = Some(SpinnerToast { message, frame: 0 }),
        }
    }

    pub fn dismiss_spinner(&mut self) {
        self.spinner = None;
    }

    /// Remove expired toasts and advance the spinner frame. Call each tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
        if let Some(ref mut s) = self.spinner {
            s.frame = (s.frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty() && self.spinner.is_none()
    }

    /// Render toasts in the top-right corner of `area`.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() {
            return;
        }
        let max_width = (area.width / 2).clamp(20, 60);
        let mut rows: Vec<(String, Style)> = Vec::new();

        if let Some(ref s) = self.spinner {
            rows.push((
                format!(" {} {} ", SPINNER_FRAMES[s.frame % SPINNER_FRAMES.len()], s.message),
                Style::default().fg(C_TOAST_INFO).add_modifier(Modifier::BOLD),
            ));
        }
        for toast in self.toasts.iter().rev().take(self.max_visible) {
            rows.push((
                format!(" {} {} ", toast.severity.icon(), toast.message),
                Style::default()
                    .fg(toast.severity.color())
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let mut y = area.y + 1;
        for (content, style) in rows {
            if y >= area.y + area.height {
                break;
            }
            let content = text::truncate(&content, max_width as usize);
            let w = (text::width(&content) as u16).min(area.width);
            let x = area.x + area.width.saturating_sub(w + 1);
            let toast_area = Rect {
                x,
                y,
                width: w,
                height: 1,
            };
            frame.render_widget(Clear, toast_area);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(content, style))),
                toast_area,
            );
            y += 1;
        }
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}
