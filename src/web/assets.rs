pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>cerrado</title>
  <link rel="stylesheet" href="/styles.css">
</head>
<body>
  <header>
    <h1>cerrado</h1>
    <div id="status">connecting&hellip;</div>
    <div id="controls">
      <button id="pause">Pause</button>
      <button id="resume">Resume</button>
      <button id="reset">Reset</button>
    </div>
  </header>
  <pre id="grid"></pre>
  <footer>
    legend: F fox &middot; r rabbit &middot; m mouse &middot; s snake &middot;
    h hawk &middot; B bear &middot; ~ river &middot; # rock &middot; , mature grass
  </footer>
  <script src="/app.js"></script>
</body>
</html>
"#;

pub const STYLES_CSS: &str = r#"body {
  background: #101510;
  color: #cfe3cf;
  font-family: monospace;
  margin: 1rem 2rem;
}
header { display: flex; gap: 1.5rem; align-items: baseline; }
h1 { margin: 0; font-size: 1.2rem; }
#grid { line-height: 1.05; font-size: 12px; letter-spacing: 1px; }
button {
  background: #1d2a1d;
  color: inherit;
  border: 1px solid #3a553a;
  padding: 0.2rem 0.8rem;
  cursor: pointer;
}
footer { color: #6f8a6f; }
"#;

pub const APP_JS: &str = r#"const grid = document.getElementById('grid');
const status = document.getElementById('status');

function show(frame) {
  grid.textContent = frame.grid.join('\n');
  const counts = Object.entries(frame.population)
    .map(([species, count]) => `${species}: ${count}`)
    .join('  ');
  const weather = frame.climate === 'rainy' ? 'rainy' : 'normal';
  const viability = frame.viable ? '' : '  [ecosystem collapsed]';
  status.textContent = `tick ${frame.tick}  climate: ${weather}  ${counts}${viability}`;
}

async function refresh() {
  const response = await fetch('/api/state');
  const envelope = await response.json();
  show(envelope.frame);
}

for (const action of ['pause', 'resume', 'reset']) {
  document.getElementById(action).addEventListener('click', async () => {
    await fetch(`/api/${action}`, { method: 'POST' });
    await refresh();
  });
}

const events = new EventSource('/api/events');
events.onmessage = (message) => show(JSON.parse(message.data));
refresh();
"#;
