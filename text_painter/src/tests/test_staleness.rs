// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use attributed_text::AttributedText;

use crate::tests::utils::{PainterTest, attrs};
use crate::{
    Affinity, AttributedRun, ColorBrush, ErrorKind, FixedAdvanceSource, GlyphLayout, GlyphSource,
    RenderContext, StaticTextNode, TextNode, TextPainter, VectorTextPainter,
};

/// Waits inside `layout` until a second layout is in flight, or gives up.
#[derive(Default)]
struct RendezvousSource {
    inner: FixedAdvanceSource,
    in_flight: AtomicUsize,
    overlapped: AtomicBool,
}

impl GlyphSource<ColorBrush> for RendezvousSource {
    fn layout(&self, run: &AttributedRun<ColorBrush>, cx: &RenderContext) -> GlyphLayout {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.in_flight.load(Ordering::SeqCst) < 2 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        if self.in_flight.load(Ordering::SeqCst) >= 2 {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        self.inner.layout(run, cx)
    }
}

#[test]
fn regenerated_run_rejects_old_marks() {
    let mut test = PainterTest::new("hello");
    let (begin, end) = test.drag(0, 3);
    let old_generation = test.node.run().generation();

    test.node.set_text(AttributedText::new("help", attrs()));
    assert_eq!(test.node.run().id(), begin.run_id());
    assert!(test.node.run().generation() > old_generation);

    let err = test
        .painter
        .get_selected(test.node(), &begin, &end)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StaleMark);
    assert_eq!(err.mark(), (begin.run_id(), old_generation));
    assert_eq!(
        err.expected(),
        Some((begin.run_id(), test.node.run().generation()))
    );

    // The painter has now seen the new generation, so geometry queries fail too.
    let err = test.painter.get_highlight_shape(&begin, &end).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StaleMark);
    let err = test.painter.caret_geometry(&begin, 1.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StaleMark);
}

#[test]
fn painting_new_generation_invalidates_highlight() {
    let mut test = PainterTest::new("hello");
    let (begin, end) = test.drag(1, 4);
    test.node.set_text(AttributedText::new("hello!", attrs()));
    // Until the painter sees the new generation, the mark's own layout still answers.
    assert!(test.painter.get_highlight_shape(&begin, &end).is_ok());
    test.painter.get_bounds(test.node());
    let err = test.painter.get_highlight_shape(&begin, &end).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StaleMark);
}

#[test]
fn fresh_marks_work_after_regeneration() {
    let mut test = PainterTest::new("hello");
    let _ = test.drag(0, 2);
    test.node.set_text(AttributedText::new("hello world", attrs()));
    let (begin, end) = test.drag(6, 10);
    assert_eq!(test.selected(&begin, &end), vec![6..10]);
    assert!(test.painter.get_highlight_shape(&begin, &end).is_ok());
}

#[test]
fn marks_against_older_snapshot_are_stale() {
    let test = PainterTest::new("abc");
    let old = test.node.run();
    let new = Arc::new(old.revise(AttributedText::new("abcd", attrs())));
    let mut newer = StaticTextNode::new(crate::AttributedRun::plain("", attrs()));
    newer.set_run(new);

    let old_mark = test.click(1, Affinity::Leading);
    let new_first = test.painter.select_first(0.0, 0.0, &newer as &dyn TextNode<ColorBrush>);
    let new_last = test.painter.select_last(0.0, 0.0, &newer as &dyn TextNode<ColorBrush>);
    assert_eq!(
        test.painter
            .get_selected(&newer as &dyn TextNode<ColorBrush>, &new_first, &new_last)
            .unwrap()
            .into_vec(),
        vec![0..4]
    );

    // Laying out the old snapshot again does not make its marks current.
    let again = test.click(1, Affinity::Leading);
    assert_eq!(again, old_mark);
    let err = test.painter.get_highlight_shape(&old_mark, &again).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StaleMark);
    // Against its own snapshot the mark is still answerable.
    assert!(test.selected(&old_mark, &again).is_empty());
}

#[test]
fn evicted_lineages_lose_staleness_detection() {
    let painter = VectorTextPainter::new(FixedAdvanceSource::new()).with_capacity(1);
    let mut first: StaticTextNode<ColorBrush> = StaticTextNode::plain("one", attrs());
    let second: StaticTextNode<ColorBrush> = StaticTextNode::plain("two", attrs());

    let mark = painter.select_first(0.0, 0.0, &first as &dyn TextNode<ColorBrush>);
    first.set_text(AttributedText::new("uno", attrs()));
    painter.get_bounds(&first as &dyn TextNode<ColorBrush>);
    assert!(painter.get_highlight_shape(&mark, &mark).is_err());

    // Another lineage pushes `first` out of the painter's memory.
    painter.get_bounds(&second as &dyn TextNode<ColorBrush>);
    assert!(painter.get_highlight_shape(&mark, &mark).is_ok());
    // Against the live run the mark is still rejected.
    let err = painter
        .get_selected(&first as &dyn TextNode<ColorBrush>, &mark, &mark)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StaleMark);
}

#[test]
fn painter_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<VectorTextPainter<FixedAdvanceSource>>();
    assert_send_sync::<crate::SelectionMark>();

    let painter = VectorTextPainter::new(FixedAdvanceSource::new());
    let nodes: Vec<StaticTextNode<ColorBrush>> = (0..4)
        .map(|i| StaticTextNode::plain(&"x".repeat(i + 1), attrs()))
        .collect();
    std::thread::scope(|scope| {
        for node in &nodes {
            let painter = &painter;
            scope.spawn(move || {
                let node: &dyn TextNode<ColorBrush> = node;
                let first = painter.select_first(0.0, 0.0, node);
                let last = painter.select_last(0.0, 0.0, node);
                let selected = painter.get_selected(node, &first, &last).unwrap();
                assert_eq!(selected.into_vec(), vec![0..node.run().len()]);
                assert!(painter.get_bounds(node).width() > 0.0);
            });
        }
    });
}

#[test]
fn layouts_of_different_nodes_run_in_parallel() {
    let painter = VectorTextPainter::new(RendezvousSource::default());
    let nodes: [StaticTextNode<ColorBrush>; 2] = [
        StaticTextNode::plain("left", attrs()),
        StaticTextNode::plain("right", attrs()),
    ];
    std::thread::scope(|scope| {
        for node in &nodes {
            let painter = &painter;
            scope.spawn(move || {
                let node: &dyn TextNode<ColorBrush> = node;
                assert!(painter.get_bounds(node).width() > 0.0);
            });
        }
    });
    assert!(
        painter.source().overlapped.load(Ordering::SeqCst),
        "the second layout should start while the first is still running"
    );
    // Both layouts were cached.
    for node in &nodes {
        let node: &dyn TextNode<ColorBrush> = node;
        assert!(Arc::ptr_eq(&painter.layout(node), &painter.layout(node)));
    }
}
