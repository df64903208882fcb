//! Page arithmetic for the post listing, and rendering of the navigation
//! controls that link the listing pages together.
//!
//! Pages are 1-indexed. Page 1 lives at the listing root, page `n` at
//! `page/<n>/`, and every link the controls emit is relative to the page it
//! appears on.

/// Number of pages needed for `post_count` posts at `page_size` posts
/// apiece. An empty catalog still gets a single page, so the empty-state
/// listing is rendered rather than nothing at all.
pub fn total_pages(post_count: usize, page_size: usize) -> usize {
    match post_count {
        0 => 1,
        n => match n % page_size {
            0 => n / page_size,
            _ => n / page_size + 1,
        },
    }
}

/// The slice of `items` shown on 1-indexed `page_number`, clipped to the
/// catalog bounds.
pub fn page_slice<T>(items: &[T], page_number: usize, page_size: usize) -> &[T] {
    let start = (page_number.saturating_sub(1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

/// Renders the Previous / page-number / Next controls for `current_page` of
/// `total_pages`. A single-page listing gets no controls at all.
///
/// Page 1 is always linked as the listing root (`../`); every other page is
/// linked by number. The current page and the out-of-range directions are
/// rendered as non-link markers.
pub fn render_controls(current_page: usize, total_pages: usize) -> String {
    if total_pages <= 1 {
        return String::new();
    }

    let mut controls = vec![String::from(r#"<div class="pagination">"#)];

    if current_page > 1 {
        controls.push(format!(
            r#"<a href="{}" class="pagination-btn">← Previous</a>"#,
            page_url(current_page - 1)
        ));
    } else {
        controls.push(String::from(
            r#"<span class="pagination-btn disabled">← Previous</span>"#,
        ));
    }

    controls.push(String::from(r#"<div class="page-numbers">"#));
    for page in 1..=total_pages {
        if page == current_page {
            controls.push(format!(
                r#"<span class="page-number current">{}</span>"#,
                page
            ));
        } else {
            controls.push(format!(
                r#"<a href="{}" class="page-number">{}</a>"#,
                page_url(page),
                page
            ));
        }
    }
    controls.push(String::from("</div>"));

    if current_page < total_pages {
        controls.push(format!(
            r#"<a href="../page/{}/" class="pagination-btn">Next →</a>"#,
            current_page + 1
        ));
    } else {
        controls.push(String::from(
            r#"<span class="pagination-btn disabled">Next →</span>"#,
        ));
    }

    controls.push(String::from("</div>"));
    controls.join("\n")
}

/// Relative link to 1-indexed `page`: the listing root for page 1, a
/// numbered directory for the rest.
fn page_url(page: usize) -> String {
    match page {
        1 => String::from("../"),
        n => format!("../page/{}/", n),
    }
}
