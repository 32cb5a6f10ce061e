//! Embedded static console page.

/// Single-page console: lists loaded types, uploads schema files and
/// triggers reloads against the management API.
pub const INDEX: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>wiregate console</title>
    <style>
      body { font-family: sans-serif; font-size: 14px; margin: 16px; }
      #ctl-box { border: 1px solid #999; padding: 8px; margin-bottom: 12px; }
      table { border-collapse: collapse; width: 100%; }
      th, td { border: 1px solid #999; padding: 5px; text-align: left; }
      th { background-color: #eee; }
      td textarea { width: 400px; height: 40px; }
    </style>
  </head>
  <body>
    <div id="ctl-box">
      <form id="upload-form">
        Schema files:
        <input type="file" multiple id="schema-files" name="schemafile"/>
        <button type="button" onclick="doUpload()">Upload</button>
        <button type="button" onclick="doReload()">Reload</button>
      </form>
    </div>
    <table id="meta-table">
      <thead>
        <tr><th>File</th><th>Type name</th><th>Kind</th><th>Example</th></tr>
      </thead>
      <tbody id="meta-body"></tbody>
    </table>
    <script>
      async function refresh() {
        const res = await fetch('/st/meta');
        const items = await res.json();
        const body = document.getElementById('meta-body');
        body.innerHTML = '';
        for (const item of items) {
          const row = document.createElement('tr');
          for (const value of [item.fileName, item.msgName, item.msgType]) {
            const cell = document.createElement('td');
            cell.textContent = value;
            row.appendChild(cell);
          }
          const example = document.createElement('td');
          const area = document.createElement('textarea');
          area.value = item.example;
          example.appendChild(area);
          row.appendChild(example);
          body.appendChild(row);
        }
      }
      async function doUpload() {
        const data = new FormData();
        for (const file of document.getElementById('schema-files').files) {
          data.append('schemafile', file, file.name);
        }
        const res = await fetch('/do/upload', { method: 'POST', body: data });
        alert(await res.text());
        refresh();
      }
      async function doReload() {
        const res = await fetch('/do/reload');
        alert(await res.text());
        refresh();
      }
      refresh();
    </script>
  </body>
</html>
"#;
