use maud::{html, Markup};

pub mod controls;
pub mod error;
pub mod master_table;

pub use controls::{sidebar, upload_failed, upload_result, SidebarVm};
pub use error::html_error_response;
pub use master_table::{master_table, TableMode};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}
