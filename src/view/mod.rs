pub mod index;
pub mod segments;

use maud::{Markup, html};

use crate::error::AppError;

#[must_use]
pub fn render_error(err: &AppError) -> Markup {
    html! {
        div class="error" role="alert" {
            p { (err.to_string()) }
        }
    }
}
