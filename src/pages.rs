//! HTML pages of the denoise demo

const UPLOAD_PAGE: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <title>Denoising Musical Sheets</title>
        <style>
            body { font-family: 'Inter', sans-serif; padding: 2rem; background-color: #0f172a; color: #f1f5f9; line-height: 1.6; }
            .container { max-width: 800px; margin: 0 auto; text-align: center; }
            h1 { color: #6366f1; font-size: 2.5rem; margin-bottom: 0.5rem; }
            .subtitle { color: #94a3b8; font-size: 1.2rem; margin-bottom: 2rem; }
            .upload-box { background-color: #1e293b; padding: 3rem 1.5rem; border-radius: 10px; border: 2px dashed #6366f1; transition: all 0.3s ease; }
            .upload-box:hover { border-color: #8b5cf6; }
            .upload-text { font-size: 1.5rem; font-weight: bold; margin-bottom: 1rem; }
            .upload-options { display: flex; flex-direction: column; gap: 1rem; align-items: center; }
            input[type="file"] { display: none; }
            label.upload-btn, .sample-btn {
                padding: 0.75rem 2rem;
                background-image: linear-gradient(135deg, #6366f1, #8b5cf6, #ec4899);
                color: white;
                border: none;
                border-radius: 25px;
                cursor: pointer;
                font-weight: bold;
                font-size: 1rem;
                transition: all 0.3s ease;
                display: inline-block;
            }
            label.upload-btn:hover, .sample-btn:hover { box-shadow: 5px 5px 15px rgba(99, 102, 241, 0.4); transform: translateY(-2px); }
            .upload-or { color: #94a3b8; margin: 1rem 0; font-size: 1rem; }
        </style>
    </head>
    <body>
        <div class="container">
            <h1>Optical Music Recognition</h1>
            <p class="subtitle">A Sheet Music Denoising Tool</p>
            <div class="upload-box">
                <p class="upload-text">Upload your image to get started</p>
                <div class="upload-options">
                    <form id="upload-form" action="/upload_and_denoise/" enctype="multipart/form-data" method="post">
                        <input name="file" type="file" id="file-input" accept="image/*" onchange="document.getElementById('upload-form').submit();">
                        <label for="file-input" class="upload-btn">Choose File</label>
                    </form>
                    <div class="upload-or">OR</div>
                    <form id="sample-form" action="/upload_and_denoise_sample/" method="post">
                        <button type="submit" class="sample-btn">Try with Sample Image</button>
                    </form>
                </div>
            </div>
        </div>
    </body>
</html>
"#;

const RESULT_STYLE: &str = r#"
            body { font-family: 'Inter', sans-serif; padding: 2rem; background-color: #0f172a; color: #f1f5f9; line-height: 1.6; }
            .container { max-width: 900px; margin: 0 auto; text-align: center; }
            h1 { color: #6366f1; font-size: 2.5rem; }
            .image-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 2rem; margin-top: 2rem; }
            .image-box { background-color: #1e293b; padding: 1rem; border-radius: 10px; border: 1px solid #6366f1; }
            .image-box h2 { margin-top: 0; font-size: 1.2rem; color: #f1f5f9; }
            .image-box img { max-width: 100%; height: auto; border-radius: 5px; }
            .back-link { display: inline-block; text-align: center; margin-top: 2rem; color: #8b5cf6; text-decoration: none; font-size: 1.1rem; padding: 0.75rem 2rem; border: 2px solid #8b5cf6; border-radius: 25px; transition: all 0.3s ease; }
            .back-link:hover { background-color: #8b5cf6; color: #fff; }
"#;

/// The upload form served at `/denoise-demo/`
pub fn upload_page() -> &'static str {
    UPLOAD_PAGE
}

/// Side-by-side view of the stored original and its cleaned version
pub fn result_page(original: &str, cleaned: &str) -> String {
    let original = escape(original);
    let cleaned = escape(cleaned);
    format!(
        r#"<!DOCTYPE html>
<html>
    <head>
        <title>Denoised Image</title>
        <style>{RESULT_STYLE}        </style>
    </head>
    <body>
        <div class="container">
            <h1>Denoising Complete!</h1>
            <div class="image-grid">
                <div class="image-box">
                    <h2>Original Image</h2>
                    <img src="/static/uploaded_images/{original}" alt="Original Musical Sheet">
                </div>
                <div class="image-box">
                    <h2>Denoised Image</h2>
                    <img src="/static/cleaned_images/{cleaned}" alt="Cleaned Musical Sheet">
                </div>
            </div>
            <a href="/denoise-demo/" class="back-link">Upload another image</a>
        </div>
    </body>
</html>
"#
    )
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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
