//! Built-in HTML report template with `{{PLACEHOLDER}}` markers.

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<style>
  body { font-family: Arial, sans-serif; margin: 2rem auto; max-width: 960px; color: #222; }
  h1 { margin-bottom: 0.25rem; }
  h2 { border-bottom: 1px solid #ddd; padding-bottom: 0.25rem; margin-top: 2rem; }
  table { border-collapse: collapse; margin: 0.5rem 0; font-size: 0.9rem; }
  th, td { border: 1px solid #ddd; padding: 0.25rem 0.6rem; text-align: right; }
  th:first-child, td:first-child { text-align: left; }
  .params th { text-align: left; background: #f6f6f6; }
  .warnings { background: #fff4e5; border-left: 4px solid #f0a020; padding: 0.25rem 1rem; }
  .plot { margin: 1rem 0; }
  .plot-title { font-weight: bold; margin-bottom: 0.25rem; }
  .empty { color: #888; font-style: italic; }
</style>
</head>
<body>
<h1>{{TITLE}}</h1>
<p class="description">{{DESCRIPTION}}</p>

<h2>Parameters</h2>
{{PARAMETERS}}
{{WARNINGS}}

<h2>Events</h2>
{{EVENTS}}

<h2>Close Prices</h2>
{{CLOSE_TABLE}}
{{CLOSE_CHART}}

<h2>Daily Returns</h2>
{{RETURNS_TABLE}}
{{RETURNS_CHART}}

<h2>Cumulative Returns</h2>
{{CUMULATIVE_TABLE}}
{{CUMULATIVE_CHART}}

<h2>Daily Price Change</h2>
{{PRICE_CHANGE_TABLE}}
{{PRICE_CHANGE_CHART}}

<h2>Return Distribution</h2>
{{HISTOGRAM_CHART}}

<h2>Summary Statistics</h2>
{{STATISTICS_TABLE}}
</body>
</html>
"#;

pub fn template() -> &'static str {
    TEMPLATE
}
