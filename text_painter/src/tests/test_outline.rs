// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::Rect;
use peniko::{Blob, FontData};

use crate::tests::utils::{assert_near, assert_rect_eq, attrs};
use crate::{
    AttributedRun, ColorBrush, DecorationKind, FontDescriptor, GlyphLayout, GlyphSource,
    OutlineSource, RenderContext, TextAttributes,
};

const UNITS_PER_EM: u16 = 1024;
/// Glyph ids in the test font.
const NOTDEF: u32 = 0;
const BOX: u32 = 1;
const SPACE: u32 = 2;

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_i16(out: &mut Vec<u8>, value: i16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// A TrueType font with three glyphs: an empty `.notdef` (advance 512), `A` drawn as
/// the box (128, 0)..(512, 640) (advance 640) and an empty space (advance 256).
///
/// Ascender 768, descender -256, underline at -128 with thickness 64, no `OS/2`.
/// All values scale exactly at 32 pixels per em.
fn box_font() -> Vec<u8> {
    let mut head = Vec::new();
    push_u32(&mut head, 0x0001_0000);
    push_u32(&mut head, 0x0001_0000);
    push_u32(&mut head, 0);
    push_u32(&mut head, 0x5F0F_3CF5);
    push_u16(&mut head, 0);
    push_u16(&mut head, UNITS_PER_EM);
    head.extend_from_slice(&[0; 16]);
    for bound in [128, 0, 512, 640] {
        push_i16(&mut head, bound);
    }
    push_u16(&mut head, 0);
    push_u16(&mut head, 8);
    push_i16(&mut head, 2);
    // Short loca offsets.
    push_i16(&mut head, 0);
    push_i16(&mut head, 0);

    let mut hhea = Vec::new();
    push_u32(&mut hhea, 0x0001_0000);
    for value in [768, -256, 0, 640, 0, 0, 512, 1, 0, 0, 0, 0, 0, 0, 0] {
        push_i16(&mut hhea, value);
    }
    push_u16(&mut hhea, 3);

    let mut maxp = Vec::new();
    push_u32(&mut maxp, 0x0000_5000);
    push_u16(&mut maxp, 3);

    let mut hmtx = Vec::new();
    for (advance, lsb) in [(512, 0), (640, 128), (256, 0)] {
        push_u16(&mut hmtx, advance);
        push_i16(&mut hmtx, lsb);
    }

    let mut glyf = Vec::new();
    push_i16(&mut glyf, 1);
    for bound in [128, 0, 512, 640] {
        push_i16(&mut glyf, bound);
    }
    push_u16(&mut glyf, 3);
    push_u16(&mut glyf, 0);
    // Four on-curve points with 16-bit deltas.
    glyf.extend_from_slice(&[1; 4]);
    for dx in [128, 0, 384, 0] {
        push_i16(&mut glyf, dx);
    }
    for dy in [0, 640, 0, -640] {
        push_i16(&mut glyf, dy);
    }
    let box_end = u16::try_from(glyf.len() / 2).expect("short offsets hold the glyph");

    let mut loca = Vec::new();
    for offset in [0, 0, box_end, box_end] {
        push_u16(&mut loca, offset);
    }

    let mut cmap = Vec::new();
    for value in [0, 1, 3, 1] {
        push_u16(&mut cmap, value);
    }
    push_u32(&mut cmap, 12);
    // Format 4 with the segments ' ', 'A' and the terminator.
    for value in [4, 40, 0, 6, 4, 1, 2] {
        push_u16(&mut cmap, value);
    }
    for end in [0x20, 0x41, 0xFFFF] {
        push_u16(&mut cmap, end);
    }
    push_u16(&mut cmap, 0);
    for start in [0x20, 0x41, 0xFFFF] {
        push_u16(&mut cmap, start);
    }
    for delta in [2 - 0x20, 1 - 0x41, 1] {
        push_i16(&mut cmap, delta);
    }
    for _ in 0..3 {
        push_u16(&mut cmap, 0);
    }

    let mut post = Vec::new();
    push_u32(&mut post, 0x0003_0000);
    push_u32(&mut post, 0);
    push_i16(&mut post, -128);
    push_i16(&mut post, 64);
    post.extend_from_slice(&[0; 20]);

    // Table records must be sorted by tag.
    let tables: [(&[u8; 4], Vec<u8>); 8] = [
        (b"cmap", cmap),
        (b"glyf", glyf),
        (b"head", head),
        (b"hhea", hhea),
        (b"hmtx", hmtx),
        (b"loca", loca),
        (b"maxp", maxp),
        (b"post", post),
    ];
    let mut font = Vec::new();
    push_u32(&mut font, 0x0001_0000);
    for value in [8, 128, 3, 0] {
        push_u16(&mut font, value);
    }
    let mut offset = 12 + 16 * tables.len();
    for (tag, data) in &tables {
        font.extend_from_slice(*tag);
        push_u32(&mut font, 0);
        push_u32(&mut font, u32::try_from(offset).expect("small font"));
        push_u32(&mut font, u32::try_from(data.len()).expect("small font"));
        offset += data.len().next_multiple_of(4);
    }
    for (_, data) in &tables {
        font.extend_from_slice(data);
        font.resize(font.len().next_multiple_of(4), 0);
    }
    font
}

fn box_attrs(font_size: f32) -> TextAttributes<ColorBrush> {
    let data = FontData::new(Blob::from(box_font()), 0);
    let mut attributes = attrs().with_font_size(font_size);
    attributes.font = FontDescriptor::new("Box").with_data(data);
    attributes
}

fn lay_out(text: &str, attributes: TextAttributes<ColorBrush>) -> GlyphLayout {
    let run = AttributedRun::plain(text, attributes);
    OutlineSource::new().layout(&run, &RenderContext::default())
}

#[test]
fn font_metrics_scale_to_size() {
    // One pixel per 32 font units.
    let layout = lay_out("A", box_attrs(32.0));
    let metrics = layout.segments()[0].metrics;
    assert_near(f64::from(metrics.ascent), 24.0);
    assert_near(f64::from(metrics.descent), 8.0);
    let (offset, size) = metrics.decoration(DecorationKind::Underline);
    assert_near(f64::from(offset), -4.0);
    assert_near(f64::from(size), 2.0);
    // Without `OS/2` the strikethrough falls back to half the ascent.
    assert_near(f64::from(metrics.strikethrough_offset), 12.0);
    assert_near(layout.segments()[0].baseline, 24.0);
}

#[test]
fn charmap_and_advances_come_from_the_font() {
    let layout = lay_out("A B", box_attrs(32.0));
    let glyphs = layout.glyphs();
    let ids: Vec<u32> = glyphs.iter().map(|glyph| glyph.id).collect();
    // `B` is not in the character map.
    assert_eq!(ids, [BOX, SPACE, NOTDEF]);
    let advances: Vec<f64> = glyphs.iter().map(|glyph| glyph.advance).collect();
    for (advance, expected) in advances.into_iter().zip([20.0, 8.0, 16.0]) {
        assert_near(advance, expected);
    }
    assert_near(glyphs[2].leading_edge(), 28.0);
    assert!(glyphs[1].outline.is_none() && glyphs[1].ink.is_none());
    assert!(glyphs[2].outline.is_none());
}

#[test]
fn outlines_are_drawn_in_local_space() {
    let layout = lay_out("AA", box_attrs(32.0));
    let glyphs = layout.glyphs();
    // Font units 128..512 by 0..640, flipped around the baseline at 24.
    let ink = glyphs[0].ink.expect("the box glyph has ink");
    assert_rect_eq(ink, Rect::new(4.0, 4.0, 16.0, 24.0));
    let second = glyphs[1].ink.expect("the box glyph has ink");
    assert_rect_eq(second, Rect::new(24.0, 4.0, 36.0, 24.0));
    assert!(glyphs[0].outline.is_some());
}
