use image::{DynamicImage, GenericImageView};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct SpinViewWidget;

impl SpinViewWidget {
    /// Render the focused frame plus the status bar.
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let status_height = 1;
        let image_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: area.height.saturating_sub(status_height),
        };
        let status_area = Rect {
            x: area.x,
            y: area.y + image_area.height,
            width: area.width,
            height: status_height,
        };

        match app.visible.and_then(|index| app.images.get(&index)) {
            Some(image) => Self::render_halfblocks(frame, image_area, image),
            None => Self::render_message(frame, image_area, "No frame to display"),
        }

        if app.loading_visible {
            Self::render_loading(frame, image_area);
        }

        Self::render_status_bar(frame, status_area, app);
    }

    /// Render status bar with position and interaction hints
    fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
        let position = app
            .visible
            .map(|index| format!(" Frame {}/{} ", index + 1, app.viewer.frame_count()))
            .unwrap_or_else(|| " Frame -/- ".to_string());

        let mut spans = vec![
            Span::styled(
                position,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled("drag ←→", Style::default().fg(Color::Cyan)),
            Span::styled(" rotate ", Style::default().fg(Color::Gray)),
            Span::styled("h/l", Style::default().fg(Color::Cyan)),
            Span::styled(" step ", Style::default().fg(Color::Gray)),
            Span::styled("q", Style::default().fg(Color::Cyan)),
            Span::styled(" quit", Style::default().fg(Color::Gray)),
        ];

        if app.grabbing {
            spans.push(Span::styled(
                "  grabbing",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ));
        }

        if !app.fully_loaded {
            spans.push(Span::styled(
                format!(
                    "  loading {}/{}",
                    app.viewer.loaded_count(),
                    app.viewer.frame_count()
                ),
                Style::default().fg(Color::Yellow),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(paragraph, area);
    }

    /// Render loading message over the image area
    fn render_loading(frame: &mut Frame, area: Rect) {
        let message = Line::from(Span::styled(
            "Loading frame...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        let paragraph = Paragraph::new(message).alignment(Alignment::Center);

        let centered_area = Rect {
            x: area.x,
            y: area.y + area.height / 2,
            width: area.width,
            height: 1,
        };
        frame.render_widget(paragraph, centered_area);
    }

    fn render_message(frame: &mut Frame, area: Rect, message: &str) {
        let message = Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ));
        let paragraph = Paragraph::new(message).alignment(Alignment::Center);

        let centered_area = Rect {
            x: area.x,
            y: area.y + area.height / 2,
            width: area.width,
            height: 1,
        };
        frame.render_widget(paragraph, centered_area);
    }

    /// Render the frame as half-block characters, centered and scaled
    /// to preserve aspect ratio. Each character cell covers two
    /// vertical pixels.
    fn render_halfblocks(frame: &mut Frame, area: Rect, img: &DynamicImage) {
        let target_width = area.width as u32;
        let target_height = (area.height as u32) * 2;
        if target_width == 0 || target_height == 0 {
            return;
        }

        let (img_width, img_height) = img.dimensions();
        let scale_w = target_width as f32 / img_width as f32;
        let scale_h = target_height as f32 / img_height as f32;
        let scale = scale_w.min(scale_h);

        let new_width = ((img_width as f32 * scale) as u32).max(1);
        let new_height = ((img_height as f32 * scale) as u32).max(1);

        let resized = img.resize_exact(new_width, new_height, image::imageops::FilterType::Triangle);
        let rgba = resized.to_rgba8();

        let x_offset = (target_width.saturating_sub(new_width)) / 2;
        let y_offset = ((area.height as u32).saturating_sub(new_height / 2)) / 2;

        for row in 0..(new_height / 2) {
            let y = row * 2;
            let mut spans: Vec<Span> = Vec::with_capacity(target_width as usize);

            if x_offset > 0 {
                spans.push(Span::raw(" ".repeat(x_offset as usize)));
            }

            for x in 0..new_width {
                let top_pixel = rgba.get_pixel(x, y);
                let bottom_pixel = if y + 1 < new_height {
                    rgba.get_pixel(x, y + 1)
                } else {
                    top_pixel
                };

                let top_color = Color::Rgb(top_pixel[0], top_pixel[1], top_pixel[2]);
                let bottom_color = Color::Rgb(bottom_pixel[0], bottom_pixel[1], bottom_pixel[2]);

                spans.push(Span::styled(
                    "▀",
                    Style::default().fg(top_color).bg(bottom_color),
                ));
            }

            let line_area = Rect {
                x: area.x,
                y: area.y + y_offset as u16 + row as u16,
                width: area.width,
                height: 1,
            };

            if line_area.y < area.y + area.height {
                frame.render_widget(Paragraph::new(Line::from(spans)), line_area);
            }
        }
    }
}
