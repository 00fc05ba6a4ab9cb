use super::FontDescriptor;

/// The text format has no escapes, so a double quote inside a value would end it early.
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "'"))
}

pub(super) fn render(descriptor: &FontDescriptor) -> String {
    let info = &descriptor.info;
    let common = &descriptor.common;

    let mut parts = vec![
        format!("info face={} size={}", quoted(&info.face), info.size),
        format!(
            "common lineHeight={} scaleW={} scaleH={} pages={}",
            common.line_height, common.scale_w, common.scale_h, common.pages
        ),
    ];
    for page in &descriptor.pages {
        parts.push(format!("page id={} file={}", page.id, quoted(&page.file)));
    }

    parts.push(format!("chars count={}", descriptor.chars.len()));
    for c in &descriptor.chars {
        parts.push(format!(
            "char id={} width={} height={} page={} x={} y={} chnl={} letter={} xoffset={} yoffset={} xadvance={}",
            c.id, c.width, c.height, c.page, c.x, c.y, c.chnl, quoted(&c.letter), c.xoffset, c.yoffset, c.xadvance
        ));
    }

    if let Some(kernings) = &descriptor.kernings {
        parts.push(format!("kernings count={}", kernings.len()));
        for k in kernings {
            parts.push(format!(
                "kerning first={} second={} amount={}",
                k.first, k.second, k.amount
            ));
        }
    }

    format!("{}\n", parts.join("\n"))
}
