//! Shared fixtures for integration and end-to-end tests.
//!
//! `scaffold` lays out a small but realistic project: a handful of
//! sources wired together with `@depend` directives, a vendored foreign
//! library, package metadata, a license file, and a manifest exercising
//! every post-processing step.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const VERSION: &str = "1.2.3";

pub const MANIFEST: &str = "\
name: Acme Widgets
output: pkg
artifacts:
  - name: main
    roots: [lib/assert.js, lib/extra.js]
    output: acme-{{version}}.js
    alias: acme.js
    steps:
      - header
  - name: embedded
    roots: [lib/core.js]
    output: acme-embedded-{{version}}.js
    steps:
      - header
      - embed:
          binding: acme
          libraries:
            - path: vendor/shim.js
              strip: \"var shim = this.shim || {};\"
  - name: compat
    roots: [lib/compat/timers.js, lib/compat/xhr.js]
    output: acme-compat-{{version}}.js
    alias: acme-compat.js
    steps:
      - header
  - name: timers
    roots: [lib/util/timers.js]
    output: acme-timers-{{version}}.js
    steps:
      - header
";

/// Write the fixture project into `root`.
pub fn scaffold(root: &Path) {
    write(root, "package.json", &format!(r#"{{"name": "acme-widgets", "version": "{VERSION}"}}"#));
    write(
        root,
        "LICENSE",
        "Copyright (c) 2010-2024, Acme Inc.\nAll rights reserved.\n",
    );

    write(root, "lib/util.js", "\"use strict\";\nvar util = {};\n");
    write(
        root,
        "lib/core.js",
        "/**\n * Core module.\n *\n * @depend util.js\n */\n\"use strict\";\nvar core = {};\n",
    );
    write(
        root,
        "lib/assert.js",
        "/**\n * @depend core.js\n */\nvar assert = {};\n",
    );
    write(
        root,
        "lib/extra.js",
        "/**\n * @depend core.js\n */\nvar extra = {};\n",
    );
    write(
        root,
        "lib/util/timers.js",
        "\"use strict\";\nvar timers = {};\n",
    );
    write(
        root,
        "lib/compat/timers.js",
        "\"use strict\";\nvar compatTimers = {};\n",
    );
    write(
        root,
        "lib/compat/xhr.js",
        "\"use strict\";\nvar compatXhr = {};\n",
    );
    write(
        root,
        "vendor/shim.js",
        "var shim = this.shim || {};\nshim.now = function () {};\n",
    );

    write(root, ".depstitch.yaml", MANIFEST);
}

fn write(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
