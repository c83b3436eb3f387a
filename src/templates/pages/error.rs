use maud::{html, Markup};

use crate::templates::desktop_layout;

pub fn error_page(status: u16, message: &str) -> Markup {
    desktop_layout(
        &format!("错误 {status}"),
        html! {
            main class="container" {
                div class="card" {
                    h1 { "错误 " (status) }
                    p { (message) }
                    p { a href="/" { "← 返回首页" } }
                }
            }
        },
    )
}
