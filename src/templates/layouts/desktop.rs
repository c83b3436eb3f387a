use maud::{html, Markup, DOCTYPE};

// No static asset pipeline: the stylesheet ships inline so the binary
// is self-contained.
const STYLE: &str = r#"
:root { --accent: #524ed2; --muted: #6b7280; --border: #e5e7eb; }
* { box-sizing: border-box; }
body {
  font-family: system-ui, "PingFang SC", "Microsoft YaHei", sans-serif;
  margin: 0;
  color: #1f2937;
  background: #f9fafb;
}
header.site {
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 0.75rem 1.5rem;
  background: #fff;
  box-shadow: 0 1px 3px rgba(0,0,0,0.08);
}
header.site h3 { margin: 0; }
header.site nav a { margin-left: 1rem; color: var(--accent); text-decoration: none; }
main.container { max-width: 1100px; margin: 1.5rem auto; padding: 0 1rem; }
.layout { display: flex; gap: 1.25rem; align-items: flex-start; }
aside.sidebar {
  flex: 0 0 240px;
  background: #fff;
  border: 1px solid var(--border);
  border-radius: 8px;
  padding: 1rem;
}
.content { flex: 1 1 auto; min-width: 0; }
.card {
  background: #fff;
  border: 1px solid var(--border);
  border-radius: 8px;
  padding: 1rem 1.25rem;
  margin-bottom: 1.25rem;
}
.card h3 { margin-top: 0; }
.tiles { display: flex; flex-wrap: wrap; gap: 0.75rem; }
.tile {
  flex: 1 1 150px;
  border: 1px solid var(--border);
  border-radius: 8px;
  padding: 0.75rem 1rem;
  background: #fff;
}
.tile .label { color: var(--muted); font-size: 0.85rem; }
.tile .value { font-size: 1.35rem; font-weight: 600; margin-top: 0.25rem; }
table { border-collapse: collapse; width: 100%; font-size: 0.9rem; }
th, td { border-bottom: 1px solid var(--border); padding: 0.4rem 0.6rem; text-align: left; }
th { color: var(--muted); font-weight: 600; }
td.num, th.num { text-align: right; }
form.filters label { display: block; margin-top: 0.75rem; font-size: 0.85rem; color: var(--muted); }
form.filters select, form.filters input {
  width: 100%;
  margin-top: 0.25rem;
  padding: 0.35rem;
  border: 1px solid var(--border);
  border-radius: 6px;
}
form.filters button {
  margin-top: 1rem;
  width: 100%;
  padding: 0.5rem;
  background: var(--accent);
  color: #fff;
  border: none;
  border-radius: 6px;
  cursor: pointer;
}
.bar-row { display: flex; align-items: center; gap: 0.5rem; margin: 0.2rem 0; }
.bar-row .bar-label { flex: 0 0 110px; font-size: 0.85rem; text-align: right; }
.bar-row .bar { background: var(--accent); height: 14px; border-radius: 3px; }
.bar-row .bar-value { font-size: 0.8rem; color: var(--muted); }
.empty { color: var(--muted); padding: 2rem 0; text-align: center; }
a.export { color: var(--accent); }
"#;

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="zh-CN" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (maud::PreEscaped(STYLE)) }
            }
            body {
                header class="site" {
                    h3 { "房产数据看板" }
                    nav {
                        a href="/" { "上传" }
                        a href="/dashboard" { "看板" }
                    }
                }
                (content)
            }
        }
    }
}
