//! Page routing and the static HTML shells.
//!
//! Each page has an init routine producing its view model. The shells only
//! fetch those view models as JSON and draw them with text nodes and Chart.js.

use crate::roster::RosterSource;
use crate::server::AppState;
use crate::views::{dashboard_view, insights_view, DashboardView, InsightsView};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Search,
    Insights,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Dashboard, Page::Search, Page::Insights];

    pub fn from_path(path: &str) -> Option<Page> {
        match path.trim_end_matches('/') {
            "/dashboard" => Some(Page::Dashboard),
            "/search" => Some(Page::Search),
            "/insights" => Some(Page::Insights),
            _ => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Page::Dashboard => "/dashboard",
            Page::Search => "/search",
            Page::Insights => "/insights",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Search => "Student Search",
            Page::Insights => "Class Insights",
        }
    }

    fn script(&self) -> &'static str {
        match self {
            Page::Dashboard => DASHBOARD_SCRIPT,
            Page::Search => SEARCH_SCRIPT,
            Page::Insights => INSIGHTS_SCRIPT,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SearchPage {
    pub total_students: usize,
    pub min_query_len: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "page", rename_all = "lowercase")]
pub enum PageView {
    Dashboard(DashboardView),
    Search(SearchPage),
    Insights(InsightsView),
}

pub async fn init_dashboard<S: RosterSource>(state: &AppState<S>) -> DashboardView {
    let students = state.roster.fetch_students().await;
    dashboard_view(&state.classifier, &students)
}

pub async fn init_search<S: RosterSource>(state: &AppState<S>) -> SearchPage {
    let students = state.roster.fetch_students().await;
    SearchPage {
        total_students: students.len(),
        min_query_len: crate::config::MIN_SEARCH_QUERY_LEN,
    }
}

pub async fn init_insights<S: RosterSource>(state: &AppState<S>) -> InsightsView {
    let students = state.roster.fetch_students().await;
    insights_view(&students)
}

/// Dispatch a page to its init routine
pub async fn init_page<S: RosterSource>(page: Page, state: &AppState<S>) -> PageView {
    match page {
        Page::Dashboard => PageView::Dashboard(init_dashboard(state).await),
        Page::Search => PageView::Search(init_search(state).await),
        Page::Insights => PageView::Insights(init_insights(state).await),
    }
}

pub fn render_shell(page: Page) -> String {
    let nav: String = Page::ALL
        .iter()
        .map(|p| format!(r#"<a href="{}">{}</a>"#, p.path(), p.title()))
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title} - Student Performance Dashboard</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>{style}</style>
</head>
<body>
    <nav>{nav} <label><input type="checkbox" id="checkbox"> Dark mode</label></nav>
    <h1>{title}</h1>
    <main id="app"></main>
    <script>{common}</script>
    <script>{script}</script>
</body>
</html>"#,
        title = page.title(),
        style = STYLE,
        nav = nav,
        common = COMMON_SCRIPT,
        script = page.script(),
    )
}

pub const HOMEPAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Student Performance Dashboard</title>
</head>
<body>
    <h1>Student Performance Dashboard</h1>
    <ul>
        <li><a href="/dashboard">Dashboard</a> - KPIs, top and at-risk students, subject charts</li>
        <li><a href="/search">Student Search</a> - look up a student profile with insights</li>
        <li><a href="/insights">Class Insights</a> - attendance vs GPA, improvement, subject difficulty</li>
    </ul>
</body>
</html>"#;

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; max-width: 1000px; margin: 30px auto; padding: 20px; }
body.dark-mode { background: #1e1e1e; color: #eee; }
.card { background: #f5f5f5; padding: 15px; border-radius: 8px; margin: 10px 0; }
body.dark-mode .card { background: #2c2c2c; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: 8px; text-align: left; border-bottom: 1px solid #ddd; }
.kpis { display: grid; grid-template-columns: 1fr 1fr 1fr; gap: 15px; }
"#;

const COMMON_SCRIPT: &str = r#"
const app = document.getElementById('app');
function el(tag, text, cls) { const e = document.createElement(tag); if (text !== undefined) e.textContent = text; if (cls) e.className = cls; return e; }
function card(title) { const c = el('div', undefined, 'card'); c.appendChild(el('h3', title)); app.appendChild(c); return c; }
function table(headers, rows) {
    const t = el('table'); const head = el('tr');
    headers.forEach(h => head.appendChild(el('th', h))); t.appendChild(head);
    rows.forEach(r => { const tr = el('tr'); r.forEach(v => tr.appendChild(v instanceof Node ? wrap(v) : el('td', String(v)))); t.appendChild(tr); });
    return t;
}
function wrap(node) { const td = el('td'); td.appendChild(node); return td; }
function chart(parent, series, opts) {
    const canvas = el('canvas'); parent.appendChild(canvas);
    new Chart(canvas.getContext('2d'), { type: series.kind, data: { labels: series.labels, datasets: [{ label: series.title, data: series.values }] }, options: opts || {} });
}
async function getJson(url) { const r = await fetch(url); return r.ok ? r.json() : null; }
(async () => {
    const toggle = document.getElementById('checkbox');
    const state = await getJson('/api/theme');
    if (state && state.dark_mode) { document.body.classList.add('dark-mode'); toggle.checked = true; }
    toggle.addEventListener('change', async () => {
        const next = await (await fetch('/api/theme/toggle', { method: 'POST' })).json();
        document.body.classList.toggle('dark-mode', next.dark_mode);
    });
})();
"#;

const DASHBOARD_SCRIPT: &str = r#"
(async () => {
    const view = await getJson('/api/dashboard');
    if (!view) return;
    const kpis = el('div', undefined, 'kpis'); app.appendChild(kpis);
    [['Total Students', view.kpis.total_students], ['Avg. Attendance', view.kpis.avg_attendance.toFixed(1) + '%'], ['Avg. GPA', view.kpis.avg_gpa.toFixed(2)]]
        .forEach(([k, v]) => { const c = el('div', undefined, 'card'); c.appendChild(el('h3', k)); c.appendChild(el('p', String(v))); kpis.appendChild(c); });
    card('Top 5 Performing Students').appendChild(table(['Name', 'Avg. GPA'], view.top_performers.map(s => [s.student_name, s.avg_gpa.toFixed(2)])));
    card('Top 5 At-Risk Students').appendChild(table(['Name', 'Avg. GPA'], view.at_risk.map(s => [s.student_name, s.avg_gpa.toFixed(2)])));
    const report = el('a', 'Download at-risk report'); report.href = '/api/reports/at-risk.csv'; app.appendChild(report);
    chart(card('Subject Attendance'), view.attendance_chart, { indexAxis: 'y', plugins: { legend: { display: false } } });
    chart(card('Subject GPA'), view.gpa_chart, { indexAxis: 'y', plugins: { legend: { display: false } } });
})();
"#;

const SEARCH_SCRIPT: &str = r#"
(async () => {
    const page = await getJson('/api/pages/search');
    if (!page) return;
    const input = el('input'); input.placeholder = 'Search by name or student ID'; app.appendChild(input);
    const results = el('div'); const profile = el('div'); app.appendChild(results); app.appendChild(profile);
    input.addEventListener('input', async () => {
        profile.replaceChildren(); results.replaceChildren();
        if (input.value.trim().length < page.min_query_len) return;
        const hits = await getJson('/api/search?q=' + encodeURIComponent(input.value));
        if (!hits || !hits.length) { results.appendChild(el('p', 'No students found.')); return; }
        results.appendChild(table(['Name', 'Student ID', 'Action'], hits.map(h => {
            const b = el('button', 'View Profile'); b.addEventListener('click', () => showProfile(h.student_id));
            return [h.student_name, h.student_id, b];
        })));
    });
    async function showProfile(id) {
        const p = await getJson('/api/students/' + encodeURIComponent(id) + '/profile');
        if (!p) return;
        results.replaceChildren(); profile.replaceChildren();
        const c = el('div', undefined, 'card'); profile.appendChild(c);
        c.appendChild(el('h2', p.student_name)); c.appendChild(el('p', p.student_id));
        c.appendChild(el('p', 'Overall CGPA: ' + p.overall_gpa.toFixed(2)));
        const predicted = el('p'); c.appendChild(predicted);
        getJson('/api/students/' + encodeURIComponent(id) + '/prediction').then(pr => {
            if (pr) predicted.textContent = 'Predicted GPA: ' + pr.predicted_gpa.toFixed(2) + ' (model MAE ' + pr.evaluation.mae.toFixed(2) + ')';
        });
        chart(c, p.attendance_donut, { cutout: '70%', plugins: { legend: { display: false }, title: { display: true, text: p.attendance_donut.title } } });
        c.appendChild(table(['Subject', 'Previous GPA', 'Current GPA', 'Attendance', 'Assignments'],
            p.grades.map(g => [g.subject_name, g.prev_gpa, g.current_gpa, g.attendance_pct + '%', g.assignment_rate + '%'])));
        c.appendChild(el('h3', 'Key Insights & Recommended Actions'));
        if (p.no_concerns) c.appendChild(el('p', p.no_concerns));
        p.insights.forEach(i => {
            const d = el('div', undefined, 'card');
            d.appendChild(el('p', 'Insight: ' + i.insight)); d.appendChild(el('p', 'Action: ' + i.action));
            if (i.resource) { const a = el('a', 'View Resource'); a.href = i.resource; a.target = '_blank'; d.appendChild(a); }
            c.appendChild(d);
        });
    }
})();
"#;

const INSIGHTS_SCRIPT: &str = r#"
(async () => {
    const view = await getJson('/api/insights');
    if (!view) return;
    const scatter = el('canvas'); card('Attendance vs GPA').appendChild(scatter);
    new Chart(scatter.getContext('2d'), { type: 'scatter', data: { datasets: [{ label: view.scatter.title, data: view.scatter.points }] },
        options: { scales: { x: { title: { display: true, text: view.scatter.x_label } }, y: { title: { display: true, text: view.scatter.y_label } } } } });
    chart(card('GPA Improvement'), view.improvement_histogram, { plugins: { legend: { display: false } }, scales: { y: { beginAtZero: true } } });
    chart(card('Subject Difficulty'), view.difficulty_chart, { indexAxis: 'y', plugins: { legend: { display: false }, title: { display: true, text: view.difficulty_chart.title } } });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_routing() {
        assert_eq!(Page::from_path("/dashboard"), Some(Page::Dashboard));
        assert_eq!(Page::from_path("/search/"), Some(Page::Search));
        assert_eq!(Page::from_path("/insights"), Some(Page::Insights));
        assert_eq!(Page::from_path("/"), None);
        assert_eq!(Page::from_path("/api/students"), None);
    }

    #[test]
    fn test_path_roundtrip() {
        for page in Page::ALL {
            assert_eq!(Page::from_path(page.path()), Some(page));
        }
    }

    #[test]
    fn test_shell_links_every_page() {
        let html = render_shell(Page::Insights);
        assert!(html.contains("<title>Class Insights - Student Performance Dashboard</title>"));
        assert!(html.contains(r#"href="/dashboard""#));
        assert!(html.contains("/api/insights"));
    }

    #[test]
    fn test_scripts_bail_out_when_a_fetch_fails() {
        for page in Page::ALL {
            let lines: Vec<&str> = page.script().lines().collect();
            for pair in lines.windows(2) {
                if pair[0].contains("= await getJson(") {
                    assert!(pair[1].trim_start().starts_with("if (!"), "{:?}: {}", page, pair[0].trim());
                }
            }
        }
    }
}
