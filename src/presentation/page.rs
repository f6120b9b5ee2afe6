// Server-rendered dashboard page
use crate::domain::query::DateRange;
use crate::domain::view::{DashboardView, TableRow};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem; color: #1f2933; }
.md-conn, .md-status { display: inline-block; padding: .3rem .8rem; border-radius: 1rem; font-weight: 600; }
.md-conn--idle, .md-status--idle { background: #e4e7eb; }
.md-conn--ok, .md-status--ok { background: #c6f7e2; color: #014d40; }
.md-conn--err, .md-status--err { background: #ffe3e3; color: #8a041a; }
.md-status--warn { background: #fff3c4; color: #8d2b0b; }
.md-summary { display: grid; grid-template-columns: repeat(3, minmax(10rem, 1fr)); gap: 1rem; margin: 1.5rem 0; }
.md-summary dt { font-size: .8rem; text-transform: uppercase; color: #616e7c; }
.md-summary dd { margin: 0; font-size: 1.4rem; }
.md-filters { display: flex; gap: .75rem; align-items: end; flex-wrap: wrap; }
table { border-collapse: collapse; margin-top: 1.5rem; min-width: 40rem; }
th, td { border-bottom: 1px solid #e4e7eb; padding: .4rem .8rem; text-align: left; }
.md-empty { color: #9aa5b1; font-style: italic; }
"#;

/// Render the full dashboard for the latest view.
///
/// `query` is the canonical query string of the current context; the page
/// reloads itself with it every `refresh_secs`.
pub fn render_dashboard(
    view: &DashboardView,
    patient_id: Option<&str>,
    range: &DateRange,
    query: &str,
    refresh_secs: u64,
) -> String {
    let summary = &view.summary;
    let refreshed = view
        .refreshed_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "--".to_string());

    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="{refresh_secs}; url=/?{query}">
<title>FetalAlert · Monitor</title>
<style>{STYLE}</style>
</head>
<body>
<header>
<h1>FetalAlert · Monitor</h1>
<span id="md-conn" class="{conn_class}">{conn_label}</span>
<span id="md-status" class="{status_class}">{status_label}</span>
<small>Última actualización: {refreshed}</small>
</header>
<form class="md-filters" method="post" action="/apply?{query}">
<label>Paciente <input id="fld-patient" name="patientId" value="{patient}"></label>
<label>Desde <input id="fld-from" name="from" type="date" value="{from}"></label>
<label>Hasta <input id="fld-to" name="to" type="date" value="{to}"></label>
<button id="btn-apply" type="submit">Aplicar</button>
<a id="btn-export" href="/export">Exportar CSV</a>
</form>
<dl class="md-summary">
<div><dt>Fecha</dt><dd id="last-date">{date}</dd></div>
<div><dt>Hora</dt><dd id="last-time">{time}</dd></div>
<div><dt>Patadas</dt><dd id="last-mov">{movements}</dd></div>
<div><dt>FC (lpm)</dt><dd id="last-hr">{hr}</dd><small id="last-hr-status">{hr_status}</small></div>
<div><dt>SpO2 (%)</dt><dd id="last-spo2">{spo2}</dd><small id="last-spo2-status">{spo2_status}</small></div>
</dl>
<table>
<thead><tr><th>Fecha</th><th>Hora</th><th>FC</th><th>SpO2</th><th>Patadas</th></tr></thead>
<tbody id="tbl-body">
"#,
        query = escape_html(query),
        conn_class = view.connection.css_class(),
        conn_label = view.connection.label(),
        status_class = view.banner.css_class(),
        status_label = view.banner.label(),
        patient = escape_html(patient_id.unwrap_or_default()),
        from = escape_html(range.from.as_deref().unwrap_or_default()),
        to = escape_html(range.to.as_deref().unwrap_or_default()),
        date = escape_html(&summary.date),
        time = escape_html(&summary.time),
        movements = escape_html(&summary.movements),
        hr = escape_html(&summary.heart_rate),
        hr_status = summary.heart_rate_status.message(),
        spo2 = escape_html(&summary.spo2),
        spo2_status = summary.spo2_status.message(),
    );

    if view.table.is_empty() {
        html.push_str("<tr><td colspan=\"5\" class=\"md-empty\">Sin datos…</td></tr>\n");
    } else {
        for row in &view.table {
            push_row(&mut html, row);
        }
    }

    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

fn push_row(html: &mut String, row: &TableRow) {
    html.push_str("<tr>");
    for cell in [&row.date, &row.time, &row.heart_rate, &row.spo2, &row.movements] {
        html.push_str(&format!("<td>{}</td>", escape_html(cell)));
    }
    html.push_str("</tr>\n");
}

/// Minimal page carrying a single user notice and a link back.
pub fn render_notice(message: &str, back_query: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head><meta charset="utf-8"><title>FetalAlert · Aviso</title><style>{STYLE}</style></head>
<body>
<p class="md-status md-status--warn" role="alert">{message}</p>
<p><a href="/?{query}">Volver al panel</a></p>
</body>
</html>
"#,
        message = escape_html(message),
        query = escape_html(back_query),
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
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
