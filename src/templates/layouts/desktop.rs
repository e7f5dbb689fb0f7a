use maud::{html, Markup, DOCTYPE};

const PAGE_CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #222; }
header { display: flex; align-items: center; justify-content: space-between; padding: 12px 24px; box-shadow: 0 1px 4px rgba(0,0,0,.1); }
header nav ul { display: flex; gap: 16px; list-style: none; margin: 0; padding: 0; }
.shell { display: flex; align-items: flex-start; }
.sidebar { width: 300px; flex-shrink: 0; padding: 16px; background: #f7f7f9; min-height: 100vh; box-sizing: border-box; }
.sidebar h4 { margin: 20px 0 8px; }
.content { flex: 1; padding: 16px 24px; overflow-x: auto; }
.notice { padding: 10px 14px; border-radius: 4px; margin-bottom: 12px; }
.notice.warn { background: #fff4e5; border: 1px solid #ffb74d; }
.notice.ok { background: #e8f5e9; border: 1px solid #81c784; }
th.sat { color: #1565c0; }
th.sun { color: #c62828; }
"#;

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (maud::PreEscaped(PAGE_CSS)) }
            }
            body {
                header {
                    h3 { "BAR Revenue Dashboard" }
                    nav {
                        ul {
                            li { a href="/" { "Dashboard" } }
                            li { a href="/snapshots" { "Snapshots" } }
                            li { a href="/export.xlsx" { "Export" } }
                        }
                    }
                }
                (content)
            }
        }
    }
}
