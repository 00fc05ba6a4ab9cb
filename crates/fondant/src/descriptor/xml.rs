use super::FontDescriptor;

struct XmlWriter {
    out: String,
    pretty: bool,
    depth: usize,
}

impl XmlWriter {
    fn new(pretty: bool) -> Self {
        Self {
            out: String::from("<?xml version=\"1.0\"?>\n"),
            pretty,
            depth: 0,
        }
    }

    fn start_line(&mut self) {
        if self.pretty {
            self.out.push_str(&"  ".repeat(self.depth));
        }
    }

    fn end_line(&mut self) {
        if self.pretty {
            self.out.push('\n');
        }
    }

    fn tag(&mut self, name: &str, attrs: &[(&str, String)], close: bool) {
        self.start_line();
        self.out.push('<');
        self.out.push_str(name);
        for (key, value) in attrs {
            self.out.push_str(&format!(" {key}=\"{}\"", escape(value)));
        }
        self.out.push_str(if close { "/>" } else { ">" });
        self.end_line();
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, String)]) {
        self.tag(name, attrs, true);
    }

    fn open(&mut self, name: &str, attrs: &[(&str, String)]) {
        self.tag(name, attrs, false);
        self.depth += 1;
    }

    fn close(&mut self, name: &str) {
        self.depth -= 1;
        self.start_line();
        self.out.push_str(&format!("</{name}>"));
        self.end_line();
    }

    fn finish(mut self) -> String {
        if !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub(super) fn render(descriptor: &FontDescriptor, pretty: bool) -> String {
    let mut w = XmlWriter::new(pretty);
    w.open("font", &[]);

    w.empty(
        "info",
        &[
            ("size", descriptor.info.size.to_string()),
            ("face", descriptor.info.face.clone()),
        ],
    );

    let common = &descriptor.common;
    w.empty(
        "common",
        &[
            ("lineHeight", common.line_height.to_string()),
            ("scaleW", common.scale_w.to_string()),
            ("scaleH", common.scale_h.to_string()),
            ("pages", common.pages.to_string()),
        ],
    );

    w.open("pages", &[]);
    for page in &descriptor.pages {
        w.empty(
            "page",
            &[("id", page.id.to_string()), ("file", page.file.clone())],
        );
    }
    w.close("pages");

    w.open("chars", &[("count", descriptor.chars.len().to_string())]);
    for c in &descriptor.chars {
        w.empty(
            "char",
            &[
                ("id", c.id.to_string()),
                ("width", c.width.to_string()),
                ("height", c.height.to_string()),
                ("page", c.page.to_string()),
                ("x", c.x.to_string()),
                ("y", c.y.to_string()),
                ("chnl", c.chnl.to_string()),
                ("letter", c.letter.clone()),
                ("xoffset", c.xoffset.to_string()),
                ("yoffset", c.yoffset.to_string()),
                ("xadvance", c.xadvance.to_string()),
            ],
        );
    }
    w.close("chars");

    if let Some(kernings) = &descriptor.kernings {
        w.open("kernings", &[("count", kernings.len().to_string())]);
        for k in kernings {
            w.empty(
                "kerning",
                &[
                    ("first", k.first.to_string()),
                    ("second", k.second.to_string()),
                    ("amount", k.amount.to_string()),
                ],
            );
        }
        w.close("kernings");
    }

    w.close("font");
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::tests::sample_descriptor;

    #[test]
    fn pretty_xml_layout() {
        let xml = render(&sample_descriptor(true), true);
        insta::assert_snapshot!(xml.trim_end(), @r#"
        <?xml version="1.0"?>
        <font>
          <info size="32" face="Synthetic"/>
          <common lineHeight="16" scaleW="128" scaleH="64" pages="1"/>
          <pages>
            <page id="1" file="atlas.png"/>
          </pages>
          <chars count="2">
            <char id="65" width="10" height="12" page="1" x="2" y="2" chnl="0" letter="A" xoffset="1" yoffset="0" xadvance="11"/>
            <char id="66" width="9" height="12" page="1" x="16" y="2" chnl="0" letter="B" xoffset="0" yoffset="2" xadvance="11"/>
          </chars>
          <kernings count="1">
            <kerning first="65" second="66" amount="-1"/>
          </kernings>
        </font>
        "#);
    }

    #[test]
    fn compact_xml_is_a_single_element_line() {
        let xml = render(&sample_descriptor(false), false);
        let lines: Vec<&str> = xml.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("<font><info size=\"32\" face=\"Synthetic\"/>"));
        assert!(lines[1].ends_with("</chars></font>"));
        assert!(!xml.contains("kernings"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        assert_eq!(escape(r#"<"&'>"#), "&lt;&quot;&amp;&apos;&gt;");
    }
}
