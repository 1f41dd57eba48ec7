//! Landing page - an upload form and the gallery grid.

/// Escape HTML special characters to prevent XSS attacks.
fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Generate the landing page.
///
/// The page posts to `/api/v1/upload` and renders `/api/v1/gallery` client
/// side; `container` only appears in the header.
pub fn generate_index_html(container: &str) -> String {
    let escaped_container = html_escape(container);

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Image Gallery - {escaped_container}</title>
    <style>
        * {{
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }}
        body {{
            background: #0f0f0f;
            color: #fff;
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            padding: 32px;
        }}
        header h1 {{
            font-size: 20px;
            font-weight: 600;
        }}
        header .meta {{
            color: rgba(255, 255, 255, 0.6);
            font-size: 12px;
            margin-top: 4px;
        }}
        form {{
            margin: 24px 0;
            padding: 16px 20px;
            background: rgba(255, 255, 255, 0.05);
            border: 1px solid rgba(255, 255, 255, 0.1);
            border-radius: 8px;
            display: flex;
            gap: 12px;
            align-items: center;
        }}
        button {{
            background: #6366f1;
            color: #fff;
            border: none;
            padding: 8px 16px;
            border-radius: 6px;
            cursor: pointer;
        }}
        #status {{
            font-size: 13px;
            color: rgba(255, 255, 255, 0.7);
        }}
        #status.error {{
            color: #f87171;
        }}
        #gallery {{
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(180px, 1fr));
            gap: 12px;
        }}
        #gallery img {{
            width: 100%;
            height: 180px;
            object-fit: cover;
            border-radius: 6px;
            background: rgba(255, 255, 255, 0.05);
        }}
    </style>
</head>
<body>
    <header>
        <h1>Image Gallery</h1>
        <div class="meta">Container: {escaped_container}</div>
    </header>

    <form id="upload-form">
        <input type="file" name="file" accept="image/*" required>
        <button type="submit">Upload</button>
        <span id="status"></span>
    </form>

    <div id="gallery"></div>

    <script>
        const statusEl = document.getElementById('status');
        const galleryEl = document.getElementById('gallery');

        function setStatus(text, isError) {{
            statusEl.textContent = text;
            statusEl.className = isError ? 'error' : '';
        }}

        async function loadGallery() {{
            try {{
                const res = await fetch('/api/v1/gallery');
                const data = await res.json();
                if (!data.ok) {{
                    setStatus(data.error, true);
                    return;
                }}
                galleryEl.replaceChildren(...data.gallery.map((url) => {{
                    const img = document.createElement('img');
                    img.src = url;
                    img.loading = 'lazy';
                    return img;
                }}));
            }} catch (err) {{
                setStatus('Failed to load gallery: ' + err, true);
            }}
        }}

        document.getElementById('upload-form').addEventListener('submit', async (event) => {{
            event.preventDefault();
            setStatus('Uploading...', false);
            try {{
                const res = await fetch('/api/v1/upload', {{
                    method: 'POST',
                    body: new FormData(event.target),
                }});
                const data = await res.json();
                if (data.ok) {{
                    setStatus('Uploaded', false);
                    event.target.reset();
                    loadGallery();
                }} else {{
                    setStatus(data.error, true);
                }}
            }} catch (err) {{
                setStatus('Upload failed: ' + err, true);
            }}
        }});

        loadGallery();
    </script>
</body>
</html>
"##
    )
}
