// ABOUTME: HTML generation module for the slider-export application
// ABOUTME: Renders slides into one self-contained document with embedded navigation

use crate::errors::{Result, SliderError};
use crate::navigation::Carousel;
use crate::slide::SlideRecord;
use crate::utils;
use log::info;
use std::fs;
use std::path::Path;

/// What to do with slide text when writing it into the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextPolicy {
    /// Insert author-trusted markup verbatim
    #[default]
    Raw,
    /// Escape markup so it shows up as literal text
    Escaped,
}

/// Options for document generation
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    pub title: String,
    pub lang: String,
    pub text_policy: TextPolicy,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            title: "Curved Scroll Transition".to_string(),
            lang: "en".to_string(),
            text_policy: TextPolicy::Raw,
        }
    }
}

/// Placeholder shown for slides without text
pub const EMPTY_TEXT_PLACEHOLDER: &str = r#"<p class="empty-text">No text</p>"#;

const TEMPLATE_CSS: &str = r#"* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: 'Arial', sans-serif;
    background: #f5f5f5;
    min-height: 100vh;
    overflow: hidden;
}

.container {
    height: 100vh;
    position: relative;
    display: flex;
    align-items: center;
    justify-content: center;
}

.content-wrapper {
    position: relative;
    height: 100vh;
    width: 100%;
    perspective: 2000px;
    transform-style: preserve-3d;
}

.content-slide {
    position: absolute;
    width: 100%;
    height: 100%;
    display: flex;
    align-items: center;
    justify-content: center;
    gap: 6rem;
    padding: 2rem;
    opacity: 0;
    transition: all 1.2s cubic-bezier(0.645, 0.045, 0.355, 1);
    transform-origin: center center;
    backface-visibility: hidden;
}

.content-slide.active {
    transform: translateX(0) rotateY(0) scale(1);
    opacity: 1;
    z-index: 2;
}

.content-slide.prev {
    transform: translateX(-100%) rotateY(-75deg) scale(0.8);
    opacity: 0;
    z-index: 1;
}

.content-slide.next {
    transform: translateX(100%) rotateY(75deg) scale(0.8);
    opacity: 0;
    z-index: 1;
}

.text-content {
    flex: 1;
    max-width: 500px;
    text-align: left;
    transform: translateZ(50px);
}

.text-content h2 {
    font-size: 3rem;
    margin-bottom: 1.5rem;
    color: #333;
}

.slide-text {
    font-size: 1.2rem;
    line-height: 1.8;
    color: #666;
}

.empty-text {
    font-style: italic;
    color: #999;
}

.image-content {
    flex: 1;
    max-width: 500px;
    transform: translateZ(100px);
}

.image-content img {
    width: 100%;
    border-radius: 20px;
    box-shadow: 0 25px 50px rgba(0,0,0,0.15);
}

.nav-controls {
    position: fixed;
    bottom: 2rem;
    width: 100%;
    display: flex;
    justify-content: space-between;
    padding: 0 4rem;
    z-index: 10;
}

.nav-arrow {
    background: #005367;
    color: white;
    border: none;
    width: 60px;
    height: 60px;
    border-radius: 50%;
    cursor: pointer;
    font-size: 2rem;
}

.slide-indicator {
    position: fixed;
    bottom: 6rem;
    left: 50%;
    transform: translateX(-50%);
    display: flex;
    gap: 0.5rem;
    z-index: 10;
}

.indicator-dot {
    width: 12px;
    height: 12px;
    border-radius: 50%;
    background: rgba(0, 83, 103, 0.3);
    cursor: pointer;
}

.indicator-dot.active {
    background: #005367;
    transform: scale(1.2);
}

@media (max-width: 768px) {
    .content-slide {
        flex-direction: column;
        gap: 2rem;
        padding: 1rem;
    }

    .text-content,
    .image-content {
        max-width: 100%;
        text-align: center;
    }

    .text-content h2 {
        font-size: 2rem;
    }
}"#;

// Mirrors navigation::Carousel: wraparound, previous mark wins over next.
const NAVIGATION_SCRIPT: &str = r#"(function () {
    const slides = document.querySelectorAll('.content-slide');
    const indicators = document.querySelectorAll('.indicator-dot');
    const prevBtn = document.querySelector('.nav-arrow.prev');
    const nextBtn = document.querySelector('.nav-arrow.next');
    const total = slides.length;
    let currentIndex = 0;

    function updateSlides() {
        slides.forEach((slide, index) => {
            slide.classList.remove('active', 'prev', 'next');
            if (index === currentIndex) {
                slide.classList.add('active');
            } else if (index === (currentIndex - 1 + total) % total) {
                slide.classList.add('prev');
            } else if (index === (currentIndex + 1) % total) {
                slide.classList.add('next');
            }
        });
        indicators.forEach((indicator, index) => {
            indicator.classList.toggle('active', index === currentIndex);
        });
    }

    function advance() {
        if (total === 0) return;
        currentIndex = (currentIndex + 1) % total;
        updateSlides();
    }

    function retreat() {
        if (total === 0) return;
        currentIndex = (currentIndex - 1 + total) % total;
        updateSlides();
    }

    function goToSlide(index) {
        if (index < 0 || index >= total) return;
        currentIndex = index;
        updateSlides();
    }

    prevBtn.addEventListener('click', retreat);
    nextBtn.addEventListener('click', advance);

    indicators.forEach((indicator) => {
        indicator.addEventListener('click', () => {
            goToSlide(Number(indicator.dataset.slide));
        });
    });

    document.addEventListener('keydown', (e) => {
        if (e.key === 'ArrowLeft') {
            retreat();
        } else if (e.key === 'ArrowRight') {
            advance();
        }
    });

    if (total > 0) {
        updateSlides();
    }
})();"#;

/// Render the slides into a complete HTML document.
///
/// Image sources are written exactly as given: callers pass remote URLs,
/// inline data URIs or relative bundle paths. Never fails, including for an
/// empty slide list.
pub fn generate_document(slides: &[SlideRecord], options: &DocumentOptions) -> String {
    info!("Generating HTML document for {} slide(s)", slides.len());

    let carousel = Carousel::new(slides.len());

    let mut html_doc = format!(
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n",
        escape_html(&options.lang)
    );
    html_doc.push_str("<meta charset=\"UTF-8\">\n");
    html_doc.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html_doc.push_str(&format!("<title>{}</title>\n", escape_html(&options.title)));
    html_doc.push_str("<style>\n");
    html_doc.push_str(TEMPLATE_CSS);
    html_doc.push_str("\n</style>\n</head>\n<body>\n");

    html_doc.push_str("<div class=\"container\">\n<div class=\"content-wrapper\">\n");
    for (index, slide) in slides.iter().enumerate() {
        let state = carousel.state_of(index).css_class();
        html_doc.push_str(&render_slide(index, slide, state, options.text_policy));
    }
    html_doc.push_str("</div>\n");

    html_doc.push_str("<div class=\"nav-controls\">\n");
    html_doc.push_str("<button class=\"nav-arrow prev\" aria-label=\"Previous slide\">&larr;</button>\n");
    html_doc.push_str("<button class=\"nav-arrow next\" aria-label=\"Next slide\">&rarr;</button>\n");
    html_doc.push_str("</div>\n");

    html_doc.push_str("<div class=\"slide-indicator\">\n");
    for index in 0..slides.len() {
        let class = if index == carousel.current() {
            "indicator-dot active"
        } else {
            "indicator-dot"
        };
        html_doc.push_str(&format!(
            "<div class=\"{}\" data-slide=\"{}\"></div>\n",
            class, index
        ));
    }
    html_doc.push_str("</div>\n</div>\n");

    html_doc.push_str("<script>\n");
    html_doc.push_str(NAVIGATION_SCRIPT);
    html_doc.push_str("\n</script>\n");
    html_doc.push_str("</body>\n</html>\n");

    html_doc
}

fn render_slide(index: usize, slide: &SlideRecord, state: &str, policy: TextPolicy) -> String {
    let class = if state.is_empty() {
        "content-slide".to_string()
    } else {
        format!("content-slide {}", state)
    };

    let heading = match &slide.title {
        Some(title) if !title.trim().is_empty() => escape_html(title),
        _ => format!("Slide {}", index + 1),
    };

    let text = if !slide.text.has_content() {
        EMPTY_TEXT_PLACEHOLDER.to_string()
    } else {
        match policy {
            TextPolicy::Raw => slide.text.as_str().to_string(),
            TextPolicy::Escaped => escape_html(slide.text.as_str()),
        }
    };

    format!(
        r#"<div class="{class}" data-index="{index}">
<div class="text-content">
<h2>{heading}</h2>
<div class="slide-text">{text}</div>
</div>
<div class="image-content">
<img src="{src}" alt="Slide {number}">
</div>
</div>
"#,
        class = class,
        index = index,
        heading = heading,
        text = text,
        src = escape_html(slide.image.src()),
        number = index + 1,
    )
}

/// Escape the characters that are significant in HTML text and attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    utils::ensure_parent_directory_exists(output_path)?;
    fs::write(output_path, html_content).map_err(SliderError::FileReadError)?;

    Ok(())
}
