use crate::models::{Difficulty, Goal, GoalForm};
use crate::progress::Progress;
use chrono::NaiveDate;

pub fn render_home(date: NaiveDate, goals: &[Goal], progress: &Progress) -> String {
    let items = if goals.is_empty() {
        r#"<li class="empty">No goals yet today. Add one to get started.</li>"#.to_string()
    } else {
        goals.iter().map(render_goal).collect::<Vec<_>>().join("\n")
    };

    HOME_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{DATE}}", &date.to_string())
        .replace("{{PERCENT}}", &progress.percent.to_string())
        .replace("{{DONE_WEIGHT}}", &progress.done_weight.to_string())
        .replace("{{TOTAL_WEIGHT}}", &progress.total_weight.to_string())
        .replace("{{GOALS}}", &items)
}

fn render_goal(goal: &Goal) -> String {
    let (class, toggle_label) = if goal.is_done {
        ("goal done", "Undo")
    } else {
        ("goal", "Done")
    };
    format!(
        r#"<li class="{class}">
        <div class="goal-main">
          <span class="goal-title">{title}</span>
          <span class="badge badge-{difficulty}">{label} &middot; {weight}</span>
        </div>
        <div class="goal-actions">
          <form method="post" action="/toggle/{id}/"><button class="btn-toggle" type="submit">{toggle_label}</button></form>
          <form method="post" action="/delete/{id}/"><button class="btn-delete" type="submit">Delete</button></form>
        </div>
      </li>"#,
        id = goal.id,
        title = escape_html(&goal.title),
        difficulty = goal.difficulty.as_str(),
        label = goal.difficulty.label(),
        weight = goal.weight,
    )
}

pub fn render_add_form(error: Option<&str>, form: &GoalForm) -> String {
    let error_html = error
        .map(|message| format!(r#"<p class="form-error" role="alert">{}</p>"#, escape_html(message)))
        .unwrap_or_default();

    let options = Difficulty::ALL
        .iter()
        .map(|difficulty| {
            let selected = if form.difficulty == difficulty.as_str() {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{value}"{selected}>{label} (weight {weight})</option>"#,
                value = difficulty.as_str(),
                label = difficulty.label(),
                weight = difficulty.weight(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n          ");

    ADD_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{ERROR}}", &error_html)
        .replace("{{OPTIONS}}", &options)
        .replace("{{TITLE}}", &escape_html(&form.title))
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = r#"
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --done: #2d7a4b;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(720px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Georgia", serif;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
      margin: 0;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #5f5c57;
    }

    .progress-card {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 10px;
    }

    .progress-track {
      height: 16px;
      border-radius: 999px;
      background: rgba(47, 72, 88, 0.1);
      overflow: hidden;
    }

    .progress-fill {
      height: 100%;
      background: var(--accent);
      border-radius: 999px;
    }

    .progress-value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    ul.goals {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    .goal {
      background: white;
      border-radius: 16px;
      padding: 14px 16px;
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .goal.done .goal-title {
      text-decoration: line-through;
      color: #8b857d;
    }

    .goal-main, .goal-actions {
      display: flex;
      align-items: center;
      gap: 10px;
    }

    .badge {
      font-size: 0.8rem;
      padding: 2px 10px;
      border-radius: 999px;
      background: rgba(47, 72, 88, 0.1);
    }

    .badge-large {
      background: rgba(255, 107, 74, 0.18);
    }

    .empty {
      color: #6f6a65;
    }

    button, .button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      text-decoration: none;
      display: inline-flex;
      align-items: center;
      justify-content: center;
    }

    .btn-primary {
      background: var(--accent);
      color: white;
    }

    .btn-toggle {
      background: var(--done);
      color: white;
    }

    .btn-delete, .btn-secondary {
      background: var(--accent-2);
      color: white;
    }

    form.goal-form {
      display: grid;
      gap: 14px;
    }

    input, select {
      font: inherit;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.25);
    }

    .form-error {
      margin: 0;
      color: #c63b2b;
    }

    .status {
      min-height: 1.2em;
      color: #6b645d;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: var(--done);
    }

    .row {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
    }
"#;

const HOME_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Today's Goals</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Today's Goals</h1>
      <p class="subtitle" id="date">{{DATE}}</p>
    </header>

    <section class="progress-card" id="progress-card">
      <span class="progress-value"><span id="percent">{{PERCENT}}</span>%</span>
      <div class="progress-track"><div class="progress-fill" style="width: {{PERCENT}}%"></div></div>
      <span class="subtitle">Weight done: <span id="done-weight">{{DONE_WEIGHT}}</span> / <span id="total-weight">{{TOTAL_WEIGHT}}</span></span>
    </section>

    <ul class="goals">
      {{GOALS}}
    </ul>

    <div class="row">
      <a class="button btn-primary" href="/add/">Add a goal</a>
      <button class="btn-secondary" id="screenshot-btn" type="button">Save screenshot</button>
    </div>
    <div class="status" id="status"></div>
  </main>

  <script>
    const statusEl = document.getElementById('status');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const drawProgress = () => {
      const percent = Number(document.getElementById('percent').textContent) || 0;
      const done = document.getElementById('done-weight').textContent;
      const total = document.getElementById('total-weight').textContent;
      const date = document.getElementById('date').textContent;

      const canvas = document.createElement('canvas');
      canvas.width = 600;
      canvas.height = 220;
      const ctx = canvas.getContext('2d');
      ctx.fillStyle = '#f8f3e6';
      ctx.fillRect(0, 0, canvas.width, canvas.height);
      ctx.fillStyle = '#2b2a28';
      ctx.font = '600 28px Georgia, serif';
      ctx.fillText('Progress ' + date, 32, 56);
      ctx.font = '600 48px sans-serif';
      ctx.fillStyle = '#2f4858';
      ctx.fillText(percent + '%', 32, 120);
      ctx.fillStyle = 'rgba(47, 72, 88, 0.15)';
      ctx.fillRect(32, 144, 536, 20);
      ctx.fillStyle = '#ff6b4a';
      ctx.fillRect(32, 144, 536 * percent / 100, 20);
      ctx.fillStyle = '#5f5c57';
      ctx.font = '16px sans-serif';
      ctx.fillText('Weight done: ' + done + ' / ' + total, 32, 196);
      return canvas.toDataURL('image/png');
    };

    const saveScreenshot = async () => {
      setStatus('Saving...', 'info');
      const res = await fetch('/save_screenshot/', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ image: drawProgress() })
      });
      const body = await res.json();
      if (!res.ok) {
        throw new Error(body.error || 'Request failed');
      }
      setStatus('Saved ' + body.filename, 'ok');
    };

    document.getElementById('screenshot-btn').addEventListener('click', () => {
      saveScreenshot().catch((err) => setStatus(err.message, 'error'));
    });
  </script>
</body>
</html>
"#;

const ADD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Add a goal</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Add a goal</h1>
      <p class="subtitle">Goals count for today only. Bigger goals weigh more.</p>
    </header>

    <form class="goal-form" method="post" action="/add/">
      {{ERROR}}
      <label for="title">Goal</label>
      <input id="title" name="title" type="text" maxlength="255" value="{{TITLE}}" autofocus />
      <label for="difficulty">Difficulty</label>
      <select id="difficulty" name="difficulty">
          {{OPTIONS}}
      </select>
      <div class="row">
        <button class="btn-primary" type="submit">Add</button>
        <a class="button btn-secondary" href="/">Back</a>
      </div>
    </form>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn goal(title: &str, is_done: bool) -> Goal {
        Goal {
            id: 7,
            client_id: "c".into(),
            title: title.into(),
            difficulty: Difficulty::Medium,
            weight: 3,
            is_done,
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            created_at: Local::now(),
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"a" & 'b'</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; &#x27;b&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn home_lists_goals_with_post_forms() {
        let goals = vec![goal("<script>x</script>", true)];
        let progress = Progress::from_goals(&goals);
        let html = render_home(goals[0].date, &goals, &progress);

        assert!(html.contains(r#"action="/toggle/7/""#));
        assert!(html.contains(r#"action="/delete/7/""#));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains(r#"<span id="percent">100</span>"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn empty_home_shows_placeholder() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let html = render_home(date, &[], &Progress::default());
        assert!(html.contains("No goals yet today"));
        assert!(html.contains(r#"<span id="percent">0</span>"#));
        assert!(html.contains("2026-01-05"));
    }

    #[test]
    fn add_form_keeps_input_and_error() {
        let form = GoalForm {
            title: "a \"quoted\" goal".into(),
            difficulty: "large".into(),
        };
        let html = render_add_form(Some("Please choose a difficulty."), &form);
        assert!(html.contains("Please choose a difficulty."));
        assert!(html.contains("a &quot;quoted&quot; goal"));
        assert!(html.contains(r#"<option value="large" selected>"#));
        assert!(!html.contains("{{"));
    }
}
