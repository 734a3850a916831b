//! Printable lesson export.
//!
//! Renders a lesson as a standalone HTML document suitable for printing or
//! archiving, served with an attachment disposition.

use crate::db::lessons::Lesson;
use crate::utils::escape_html;

/// Suggested download filename for a lesson export.
pub fn export_filename(lesson: &Lesson) -> String {
    format!("lesson_{}_{}.html", lesson.id, lesson.slug)
}

fn push_list_section(html: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    html.push_str(&format!("<h2>{}</h2>\n<ol>\n", heading));
    for item in items {
        html.push_str(&format!("  <li>{}</li>\n", escape_html(item)));
    }
    html.push_str("</ol>\n");
}

fn push_text_section(html: &mut String, heading: &str, text: Option<&str>) {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return;
    };
    html.push_str(&format!("<h2>{}</h2>\n", heading));
    for paragraph in text.split("\n\n").filter(|p| !p.trim().is_empty()) {
        html.push_str(&format!("<p>{}</p>\n", escape_html(paragraph.trim())));
    }
}

/// Render a lesson as a self-contained HTML document.
pub fn render_lesson_html(lesson: &Lesson) -> String {
    let title = escape_html(&lesson.topic);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", title));
    html.push_str(
        "<style>\n\
         body { font-family: Georgia, serif; max-width: 48rem; margin: 2rem auto; color: #222; }\n\
         h1 { border-bottom: 2px solid #444; padding-bottom: 0.3rem; }\n\
         h2 { margin-top: 1.5rem; color: #334; }\n\
         .meta { color: #666; font-size: 0.9rem; }\n\
         img { max-width: 100%; margin: 0.5rem 0; }\n\
         @media print { body { margin: 0; } }\n\
         </style>\n</head>\n<body>\n",
    );

    html.push_str(&format!("<h1>{}</h1>\n", title));
    html.push_str(&format!(
        "<p class=\"meta\">{} &middot; {} &middot; {} minutes</p>\n",
        escape_html(&lesson.subject),
        escape_html(&lesson.grade_level),
        lesson.duration_minutes
    ));

    push_text_section(&mut html, "Description", lesson.description.as_deref());
    push_text_section(&mut html, "Lesson Content", lesson.content.as_deref());
    push_list_section(&mut html, "Activities", &lesson.activities);
    push_list_section(&mut html, "Practice Questions", &lesson.questions);
    push_text_section(&mut html, "Summary", lesson.summary.as_deref());

    if !lesson.image_urls.is_empty() {
        html.push_str("<h2>Images</h2>\n");
        for url in &lesson.image_urls {
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\">\n",
                escape_html(url),
                title
            ));
        }
    }

    if !lesson.video_links.is_empty() {
        html.push_str("<h2>Videos</h2>\n<ul>\n");
        for video in &lesson.video_links {
            html.push_str(&format!(
                "  <li><a href=\"{}\">{}</a></li>\n",
                escape_html(&video.url),
                escape_html(&video.title)
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VideoLink;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_lesson() -> Lesson {
        Lesson {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            topic: "Photosynthesis & Light".to_string(),
            subject: "Biology".to_string(),
            grade_level: "Grade 8".to_string(),
            duration_minutes: 45,
            description: Some("How plants convert light.".to_string()),
            content: Some("First paragraph.\n\nSecond paragraph.".to_string()),
            activities: vec!["Leaf observation <lab>".to_string()],
            questions: vec!["What is chlorophyll?".to_string()],
            summary: Some("Plants make food from light.".to_string()),
            image_urls: vec!["https://images.example/a.jpg".to_string()],
            video_links: vec![VideoLink {
                title: "Photosynthesis in 5 minutes".to_string(),
                url: "https://www.youtube.com/watch?v=abc".to_string(),
            }],
            is_public: false,
            slug: "photosynthesis-light".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn renders_all_sections() {
        let html = render_lesson_html(&sample_lesson());
        assert!(html.contains("<h1>Photosynthesis &amp; Light</h1>"));
        assert!(html.contains("<h2>Description</h2>"));
        assert!(html.contains("<h2>Activities</h2>"));
        assert!(html.contains("<h2>Practice Questions</h2>"));
        assert!(html.contains("<h2>Summary</h2>"));
        assert!(html.contains("<h2>Images</h2>"));
        assert!(html.contains("<h2>Videos</h2>"));
    }

    #[test]
    fn escapes_user_content() {
        let html = render_lesson_html(&sample_lesson());
        assert!(html.contains("Leaf observation &lt;lab&gt;"));
        assert!(!html.contains("<lab>"));
    }

    #[test]
    fn splits_content_paragraphs() {
        let html = render_lesson_html(&sample_lesson());
        assert!(html.contains("<p>First paragraph.</p>"));
        assert!(html.contains("<p>Second paragraph.</p>"));
    }

    #[test]
    fn empty_sections_omitted() {
        let mut lesson = sample_lesson();
        lesson.image_urls.clear();
        lesson.video_links.clear();
        lesson.summary = None;
        let html = render_lesson_html(&lesson);
        assert!(!html.contains("<h2>Images</h2>"));
        assert!(!html.contains("<h2>Videos</h2>"));
        assert!(!html.contains("<h2>Summary</h2>"));
    }

    #[test]
    fn filename_includes_id_and_slug() {
        let lesson = sample_lesson();
        let name = export_filename(&lesson);
        assert!(name.starts_with(&format!("lesson_{}", lesson.id)));
        assert!(name.ends_with("photosynthesis-light.html"));
    }
}
