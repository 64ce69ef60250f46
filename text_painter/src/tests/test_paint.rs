// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use attributed_text::AttributedText;
use peniko::Color;
use peniko::kurbo::Affine;

use crate::tests::utils::{PainterTest, attrs};
use crate::{
    Affinity, ColorBrush, DecorationKind, DrawCommand, Recording, StaticTextNode, TextPainter,
};

fn kinds(recording: &Recording<ColorBrush>) -> Vec<&'static str> {
    recording
        .commands()
        .iter()
        .map(|command| match command {
            DrawCommand::SetTransform(_) => "transform",
            DrawCommand::FillGlyph { .. } => "fill_glyph",
            DrawCommand::StrokeGlyph { .. } => "stroke_glyph",
            DrawCommand::FillRect { .. } => "fill_rect",
            DrawCommand::StrokeRect { .. } => "stroke_rect",
        })
        .collect()
}

fn fully_decorated() -> crate::TextAttributes<ColorBrush> {
    attrs()
        .with_decoration(DecorationKind::Underline)
        .with_decoration(DecorationKind::Overline)
        .with_decoration(DecorationKind::Strikethrough)
}

#[test]
fn decorations_wrap_glyphs_in_order() {
    let test = PainterTest::with_attributes("a", fully_decorated());
    let mut recording = Recording::new();
    test.painter.paint(test.node(), &mut recording);
    assert_eq!(
        kinds(&recording),
        ["transform", "fill_rect", "fill_rect", "fill_glyph", "fill_rect"]
    );
    let DrawCommand::FillRect { rect: underline, .. } = &recording.commands()[1] else {
        panic!("expected the underline first");
    };
    assert!(underline.y0 > 12.0, "underline should sit below the baseline");
}

#[test]
fn stroked_text_strokes_glyphs_and_decorations() {
    let test = PainterTest::with_attributes(
        "a",
        fully_decorated().with_stroke(ColorBrush::new(Color::WHITE), 1.5),
    );
    let mut recording = Recording::new();
    test.painter.paint(test.node(), &mut recording);
    assert_eq!(
        kinds(&recording),
        [
            "transform",
            "fill_rect",
            "stroke_rect",
            "fill_rect",
            "stroke_rect",
            "fill_glyph",
            "stroke_glyph",
            "fill_rect",
            "stroke_rect",
        ]
    );
    let DrawCommand::StrokeGlyph { stroke, brush, .. } = &recording.commands()[6] else {
        panic!("expected a glyph stroke");
    };
    assert_eq!(stroke.width, 1.5);
    assert_eq!(brush.color, Color::WHITE);
}

#[test]
fn decoration_brush_overrides_fill() {
    let red = ColorBrush::new(Color::from_rgb8(255, 0, 0));
    let mut attributes = attrs().with_decoration(DecorationKind::Underline);
    if let Some(underline) = attributes.underline.as_mut() {
        underline.brush = Some(red);
    }
    attributes.fill = None;
    let test = PainterTest::with_attributes("a", attributes);
    let mut recording = Recording::new();
    test.painter.paint(test.node(), &mut recording);
    // No fill: the glyph is not drawn, the underline keeps its own brush.
    assert_eq!(kinds(&recording), ["transform", "fill_rect"]);
    let DrawCommand::FillRect { brush, .. } = &recording.commands()[1] else {
        panic!("expected the underline");
    };
    assert_eq!(*brush, red);
}

#[test]
fn paint_uses_node_transform() {
    let transform = Affine::translate((10.0, 20.0)).then_scale(2.0);
    let node = StaticTextNode::plain("ab", attrs()).with_transform(transform);
    let test = PainterTest::from_node(node);
    let mut recording = Recording::new();
    test.painter.paint(test.node(), &mut recording);
    assert_eq!(recording.commands()[0], DrawCommand::SetTransform(transform));
    assert_eq!(recording.len(), 3);
}

#[test]
fn segments_paint_with_their_own_attributes() {
    let blue = ColorBrush::new(Color::from_rgb8(0, 0, 255));
    let mut text = AttributedText::new("a b", attrs());
    let mut styled = attrs();
    styled.fill = Some(blue);
    text.apply_attribute(2..3, styled).unwrap();
    let test = PainterTest::from_text(text);
    let mut recording = Recording::new();
    test.painter.paint(test.node(), &mut recording);
    // The space has no outline and draws nothing.
    let fills: Vec<_> = recording
        .commands()
        .iter()
        .filter_map(|command| match command {
            DrawCommand::FillGlyph { id, brush, .. } => Some((*id, brush.color)),
            _ => None,
        })
        .collect();
    assert_eq!(
        fills,
        [(u32::from('a'), Color::BLACK), (u32::from('b'), blue.color)]
    );
}

#[test]
fn paint_leaves_marks_valid() {
    let test = PainterTest::new("abc");
    let begin = test.click(0, Affinity::Leading);
    let end = test.click(2, Affinity::Leading);
    let mut recording = Recording::new();
    let painter: &dyn TextPainter<ColorBrush> = &test.painter;
    painter.paint(test.node(), &mut recording);
    painter.paint(test.node(), &mut recording);
    assert_eq!(test.selected(&begin, &end), vec![0..2]);
    assert!(painter.get_highlight_shape(&begin, &end).is_ok());
}

#[test]
fn empty_run_paints_nothing_but_transform() {
    let test = PainterTest::new("");
    let mut recording = Recording::new();
    test.painter.paint(test.node(), &mut recording);
    assert_eq!(kinds(&recording), ["transform"]);
}
