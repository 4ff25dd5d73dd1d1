//! HTML landing page at `/`.

use axum::response::Html;

const HOME_HTML: &str = r#"<!DOCTYPE html>
<html lang="id">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Kasir API</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 760px; margin: 2rem auto; color: #1e293b; }
        h1 { color: #2563eb; }
        section { border: 1px solid #e2e8f0; border-radius: 8px; padding: 1rem 1.5rem; margin-bottom: 1rem; }
        code { background: #f1f5f9; padding: 0.1rem 0.3rem; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>Kasir API</h1>
    <p>Point-of-sale backend: catalog, checkout and sales reports.</p>

    <section>
        <h2>Catalog</h2>
        <p><code>GET/POST /api/categories</code> &middot; <code>GET/PUT/DELETE /api/categories/{id}</code></p>
        <p><code>GET/POST /api/produk</code> &middot; <code>GET/PUT/DELETE /api/produk/{id}</code></p>
    </section>

    <section>
        <h2>Sales</h2>
        <p><code>POST /api/checkout</code></p>
        <p><code>GET /api/report?start_date=YYYY-MM-DD&amp;end_date=YYYY-MM-DD</code> &middot; <code>GET /api/report/today</code></p>
    </section>

    <section>
        <h2>Service</h2>
        <p>Documentation: <a href="/swagger/index.html">/swagger/index.html</a></p>
        <p>Health check: <a href="/health">/health</a></p>
    </section>
</body>
</html>
"#;

pub async fn home() -> Html<&'static str> {
    Html(HOME_HTML)
}
