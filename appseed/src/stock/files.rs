//! Embedded stock template files
//!
//! Paths are relative to the stock package root. The package manifest points
//! at `template_src/`, which holds the project skeleton.

/// Stock package manifest
pub const PACKAGE_MANIFEST: &str = r#"{
    "name": "appseed-app-hello-world",
    "version": "1.0.0",
    "description": "Stock hello-world template used by appseed",
    "dirname": "template_src",
    "author": "Appseed Team",
    "license": "Apache-2.0"
}
"#;

/// Project package.json
pub const TEMPLATE_PACKAGE_JSON: &str = r#"{
    "name": "io.appseed.hello",
    "displayName": "HelloAppseed",
    "version": "1.0.0",
    "description": "A sample mobile application created with appseed.",
    "main": "index.js",
    "scripts": {
        "test": "echo \"Error: no test specified\" && exit 1"
    },
    "keywords": [
        "ecosystem:appseed"
    ],
    "author": "Appseed Team",
    "license": "Apache-2.0"
}
"#;

/// Project config.xml
pub const CONFIG_XML: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<widget id="io.appseed.hello" version="1.0.0" xmlns="http://www.w3.org/ns/widgets">
    <name>HelloAppseed</name>
    <description>Sample app generated by appseed.</description>
    <author email="dev@appseed.dev" href="https://appseed.dev">
        Appseed Team
    </author>
    <content src="index.html" />
    <allow-intent href="http://*/*" />
    <allow-intent href="https://*/*" />
</widget>
"#;

/// Start page
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <meta charset="utf-8">
        <meta http-equiv="Content-Security-Policy" content="default-src 'self' data: https://ssl.gstatic.com 'unsafe-eval'; style-src 'self' 'unsafe-inline'; media-src *; img-src 'self' data: content:;">
        <meta name="format-detection" content="telephone=no">
        <meta name="msapplication-tap-highlight" content="no">
        <meta name="viewport" content="initial-scale=1, width=device-width, viewport-fit=cover">
        <meta name="color-scheme" content="light dark">
        <link rel="stylesheet" href="css/index.css">
        <title>Hello World</title>
    </head>
    <body>
        <div class="app">
            <h1>Appseed</h1>
            <div id="deviceready" class="blink">
                <p class="event listening">Connecting to Device</p>
                <p class="event received">Device is Ready</p>
            </div>
        </div>
        <script src="js/index.js"></script>
    </body>
</html>
"#;

/// Start page stylesheet
pub const INDEX_CSS: &str = r"* {
    -webkit-tap-highlight-color: rgba(0,0,0,0);
}

body {
    font-family: system-ui, -apple-system, sans-serif;
    font-size: 12px;
    height: 100vh;
    margin: 0;
    padding: env(safe-area-inset-top, 0px) env(safe-area-inset-right, 0px)
        env(safe-area-inset-bottom, 0px) env(safe-area-inset-left, 0px);
    text-transform: uppercase;
    width: 100%;
}

.app {
    left: 50%;
    position: absolute;
    text-align: center;
    top: 50%;
    transform: translate(-50%, -50%);
}

.event {
    border-radius: 4px;
    color: #ffffff;
    font-size: 12px;
    margin: 0 30px;
    padding: 2px 0;
}

.event.listening {
    background-color: #333333;
    display: block;
}

.event.received {
    background-color: #4b946a;
    display: none;
}

#deviceready.ready .event.listening { display: none; }
#deviceready.ready .event.received { display: block; }
";

/// Start page script
pub const INDEX_JS: &str = r"// Wait for the native layer to finish loading before touching device APIs.
document.addEventListener('deviceready', onDeviceReady, false);

function onDeviceReady() {
    console.log('Running on ' + (window.device ? device.platform : 'unknown platform'));
    document.getElementById('deviceready').classList.add('ready');
}
";

/// Hooks directory placeholder
pub const HOOKS_README: &str = r#"# Hooks

Scripts placed here run at fixed points of the build lifecycle. Declare them
in `config.xml` with `<hook type="before_build" src="hooks/script.js" />`.
"#;

/// Shipped without a leading dot; renamed to `.gitignore` on creation
pub const GITIGNORE: &str = r".DS_Store
node_modules/
platforms/
plugins/
";

/// Every stock file as `(relative path, contents)`
pub const STOCK_FILES: &[(&str, &str)] = &[
    ("package.json", PACKAGE_MANIFEST),
    ("template_src/package.json", TEMPLATE_PACKAGE_JSON),
    ("template_src/config.xml", CONFIG_XML),
    ("template_src/gitignore", GITIGNORE),
    ("template_src/hooks/README.md", HOOKS_README),
    ("template_src/www/index.html", INDEX_HTML),
    ("template_src/www/css/index.css", INDEX_CSS),
    ("template_src/www/js/index.js", INDEX_JS),
];
