//! Server-rendered HTML pages
//!
//! Every page shares `layout`; user-supplied text goes through `escape`.

use finadv_core::{Amount, Debt, Income, MonthRange};

use crate::theme::Theme;

const APP_NAME: &str = "FinAdv";

/// Escape text for HTML element and attribute content.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap `body` in the shared document shell.
pub fn layout(title: &str, theme: Theme, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en" data-theme="{theme}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {app}</title>
<link rel="stylesheet" href="/static/app.css">
<script src="https://unpkg.com/htmx.org@2.0.4" defer></script>
</head>
<body>
<header class="topbar">
<a class="brand" href="/">{app}</a>
<button class="theme-toggle" hx-post="/theme/toggle" hx-swap="none">{toggle}</button>
</header>
<main>
{body}
</main>
</body>
</html>
"#,
        theme = theme,
        title = escape(title),
        app = APP_NAME,
        toggle = match theme {
            Theme::Light => "Dark mode",
            Theme::Dark => "Light mode",
        },
        body = body,
    )
}

/// Incomes and debts recorded in one calendar month
pub struct MonthSummary<'a> {
    pub range: MonthRange,
    pub incomes: &'a [Income],
    pub debts: &'a [Debt],
}

impl MonthSummary<'_> {
    pub fn total_income(&self) -> Amount {
        self.incomes.iter().map(|i| i.amount).sum()
    }

    pub fn total_debt(&self) -> Amount {
        self.debts.iter().map(|d| d.amount).sum()
    }

    pub fn balance(&self) -> Amount {
        Amount::new(self.total_income().as_decimal() - self.total_debt().as_decimal())
    }
}

pub fn home(theme: Theme, summary: &MonthSummary<'_>) -> String {
    let mut body = String::new();
    let first = summary.range.first;
    let prev = first.pred_opt().map(MonthRange::containing);
    let next = summary.range.last.succ_opt().map(MonthRange::containing);

    body.push_str(r#"<section class="month"><nav class="month-nav">"#);
    if let Some(prev) = prev {
        body.push_str(&format!(r#"<a href="{}">&larr;</a>"#, month_href(&prev)));
    }
    body.push_str(&format!("<h1>{}</h1>", first.format("%B %Y")));
    if let Some(next) = next {
        body.push_str(&format!(r#"<a href="{}">&rarr;</a>"#, month_href(&next)));
    }
    body.push_str(&format!(
        r#"</nav>
<dl class="totals">
<dt>Income</dt><dd>{}</dd>
<dt>Debts</dt><dd>{}</dd>
<dt>Balance</dt><dd>{}</dd>
</dl></section>"#,
        summary.total_income(),
        summary.total_debt(),
        summary.balance()
    ));

    body.push_str(r#"<section class="incomes"><h2>Income</h2>"#);
    if summary.incomes.is_empty() {
        body.push_str(r#"<p class="empty">No income recorded this month.</p>"#);
    } else {
        body.push_str(
            "<table><thead><tr><th>Date</th><th>Source</th><th>Type</th><th>Amount</th><th>Description</th></tr></thead><tbody>",
        );
        for income in summary.incomes {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                income.entry_date,
                escape(&income.source),
                income.income_type,
                income.amount,
                escape(&income.description)
            ));
        }
        body.push_str("</tbody></table>");
    }
    body.push_str("</section>");

    body.push_str(r#"<section class="debts"><h2>Debts</h2>"#);
    if summary.debts.is_empty() {
        body.push_str(r#"<p class="empty">No debts recorded this month.</p>"#);
    } else {
        body.push_str(
            "<table><thead><tr><th>Date</th><th>Method</th><th>Amount</th><th>Due</th><th>Status</th><th>Description</th></tr></thead><tbody>",
        );
        for debt in summary.debts {
            let due = debt
                .due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            body.push_str(&format!(
                r#"<tr class="{class}"><td>{date}</td><td>{method}{recurrent}</td><td>{amount}</td><td>{due}</td><td>{status}</td><td>{desc}</td></tr>"#,
                class = if debt.paid { "paid" } else { "unpaid" },
                date = debt.entry_date,
                method = debt.payment_method,
                recurrent = if debt.is_recurrent { " (recurring)" } else { "" },
                amount = debt.amount,
                due = due,
                status = if debt.paid { "Paid" } else { "Open" },
                desc = escape(&debt.description),
            ));
        }
        body.push_str("</tbody></table>");
    }
    body.push_str("</section>");

    layout("Home", theme, &body)
}

fn month_href(range: &MonthRange) -> String {
    format!("/?year={}&month={}", range.year(), range.month())
}

pub fn not_found(theme: Theme) -> String {
    layout(
        "Page not found",
        theme,
        r#"<section class="error-page">
<h1>Page not found</h1>
<p>The page you're looking for doesn't exist.</p>
<p><a href="/">Back to home</a></p>
</section>"#,
    )
}

/// Generic failure page; carries no detail about the cause.
pub fn server_error() -> String {
    layout(
        "Something went wrong",
        Theme::default(),
        r#"<section class="error-page">
<h1>Something went wrong</h1>
<p>An unexpected error occurred. Please try again later.</p>
<p><a href="/">Back to home</a></p>
</section>"#,
    )
}
