//! Pipeline driver: feeds records from a source into a [`DynamicHandler`].
//!
//! The runner routes each record to the matching dispatch operation in source
//! order, counts what it routed and issues flushes on a configurable cadence.
//! It never reorders, batches or filters records.

use std::num::NonZeroUsize;

use osmflow_core::OsmObject;
use tracing::{debug, trace};

use crate::dynamic::DynamicHandler;

/// Runner configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Flush after every `n` records (none: only at finish).
    pub flush_every: Option<NonZeroUsize>,
    /// Flush once more when [`Runner::finish`] is called.
    pub flush_on_finish: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            flush_every: None,
            flush_on_finish: true,
        }
    }
}

impl RunnerConfig {
    pub fn with_flush_every(mut self, n: NonZeroUsize) -> Self {
        self.flush_every = Some(n);
        self
    }

    pub fn without_final_flush(mut self) -> Self {
        self.flush_on_finish = false;
        self
    }
}

/// Counts of records routed per category.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub nodes: u64,
    pub ways: u64,
    pub relations: u64,
    pub areas: u64,
    pub changesets: u64,
    pub flushes: u64,
}

impl ApplyStats {
    /// Records routed, flushes excluded.
    pub fn objects(&self) -> u64 {
        self.nodes + self.ways + self.relations + self.areas + self.changesets
    }
}

/// Runs records through a [`DynamicHandler`] and tracks progress.
#[derive(Debug, Default)]
pub struct Runner {
    handler: DynamicHandler,
    config: RunnerConfig,
    stats: ApplyStats,
    since_flush: usize,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self::with_handler(DynamicHandler::new(), config)
    }

    pub fn with_handler(handler: DynamicHandler, config: RunnerConfig) -> Self {
        Self {
            handler,
            config,
            stats: ApplyStats::default(),
            since_flush: 0,
        }
    }

    pub fn handler(&self) -> &DynamicHandler {
        &self.handler
    }

    /// The handler, for binding or inspecting the consumer.
    pub fn handler_mut(&mut self) -> &mut DynamicHandler {
        &mut self.handler
    }

    pub fn into_handler(self) -> DynamicHandler {
        self.handler
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn stats(&self) -> ApplyStats {
        self.stats
    }

    /// Route a single record to its dispatch operation.
    pub fn apply(&mut self, object: &OsmObject) {
        route(&mut self.handler, object, &mut self.stats);

        self.since_flush += 1;
        if let Some(every) = self.config.flush_every {
            if self.since_flush >= every.get() {
                self.flush();
            }
        }
    }

    /// Apply many records in order.
    pub fn run<'a>(&mut self, objects: impl IntoIterator<Item = &'a OsmObject>) {
        for object in objects {
            self.apply(object);
        }
    }

    /// Apply records from a fallible source, stopping at the first error.
    ///
    /// The error is returned as produced by the source. No flush is issued for
    /// the failed run.
    pub fn run_fallible<E>(
        &mut self,
        objects: impl IntoIterator<Item = Result<OsmObject, E>>,
    ) -> Result<(), E> {
        for object in objects {
            self.apply(&object?);
        }
        Ok(())
    }

    /// Flush the handler now.
    pub fn flush(&mut self) {
        trace!(after = self.since_flush, "flushing handler");
        self.handler.flush();
        self.stats.flushes += 1;
        self.since_flush = 0;
    }

    /// End of input: final flush (if configured) and stats.
    pub fn finish(&mut self) -> ApplyStats {
        if self.config.flush_on_finish {
            self.flush();
        }
        debug!(
            consumer = self.handler.consumer_type().unwrap_or("<unbound>"),
            nodes = self.stats.nodes,
            ways = self.stats.ways,
            relations = self.stats.relations,
            areas = self.stats.areas,
            changesets = self.stats.changesets,
            flushes = self.stats.flushes,
            "run finished"
        );
        self.stats
    }
}

fn route(handler: &mut DynamicHandler, object: &OsmObject, stats: &mut ApplyStats) {
    match object {
        OsmObject::Node(node) => {
            handler.node(node);
            stats.nodes += 1;
        }
        OsmObject::Way(way) => {
            handler.way(way);
            stats.ways += 1;
        }
        OsmObject::Relation(relation) => {
            handler.relation(relation);
            stats.relations += 1;
        }
        OsmObject::Area(area) => {
            handler.area(area);
            stats.areas += 1;
        }
        OsmObject::Changeset(changeset) => {
            handler.changeset(changeset);
            stats.changesets += 1;
        }
    }
}

/// Dispatch every record to `handler`, then flush once.
pub fn apply<'a>(
    handler: &mut DynamicHandler,
    objects: impl IntoIterator<Item = &'a OsmObject>,
) -> ApplyStats {
    let mut stats = ApplyStats::default();
    for object in objects {
        route(handler, object, &mut stats);
    }
    handler.flush();
    stats.flushes += 1;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{Flush, FlushHandler, NodeHandler, Visit};
    use osmflow_core::{Changeset, JsonLines, Node, OsmError, Way};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const INPUT: &str = concat!(
        r#"{"type":"node","id":1,"location":{"lon":0.0,"lat":0.0}}"#,
        "\n",
        r#"{"type":"node","id":2,"location":{"lon":1.0,"lat":1.0}}"#,
        "\n",
        r#"{"type":"way","id":10,"nodes":[1,2]}"#,
        "\n",
        r#"{"type":"relation","id":20,"members":[{"kind":"way","ref":10,"role":""}]}"#,
        "\n",
        r#"{"type":"changeset","id":30,"created_at":"2024-05-01T12:00:00Z"}"#,
        "\n",
    );

    fn test_objects() -> Vec<OsmObject> {
        JsonLines::new(INPUT.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[derive(Default)]
    struct NodeCounter {
        nodes: usize,
        flushes: usize,
    }

    impl NodeHandler for NodeCounter {
        fn node(&mut self, _: &Node) {
            self.nodes += 1;
        }
    }

    impl FlushHandler for NodeCounter {
        fn flush(&mut self) {
            self.flushes += 1;
        }
    }

    #[test]
    fn run_routes_records_and_counts_them() {
        let mut runner = Runner::new(RunnerConfig::default());
        crate::bind!(*runner.handler_mut(), NodeCounter::default());

        runner.run(&test_objects());
        let stats = runner.finish();

        assert_eq!(stats.nodes, 2);
        assert_eq!(stats.ways, 1);
        assert_eq!(stats.relations, 1);
        assert_eq!(stats.changesets, 1);
        assert_eq!(stats.objects(), 5);
        assert_eq!(stats.flushes, 1);

        let consumer = runner.handler().consumer::<NodeCounter>().unwrap();
        assert_eq!(consumer.nodes, 2);
        assert_eq!(consumer.flushes, 1);
    }

    #[test]
    fn flush_cadence_is_honored() {
        let config = RunnerConfig::default().with_flush_every(NonZeroUsize::new(2).unwrap());
        let mut runner = Runner::new(config);
        crate::bind!(*runner.handler_mut(), NodeCounter::default());

        runner.run(&test_objects());
        assert_eq!(runner.stats().flushes, 2);

        let stats = runner.finish();
        assert_eq!(stats.flushes, 3);
        assert_eq!(runner.handler().consumer::<NodeCounter>().unwrap().flushes, 3);
    }

    #[test]
    fn final_flush_can_be_disabled() {
        let mut runner = Runner::new(RunnerConfig::default().without_final_flush());
        runner.run(&test_objects());
        assert_eq!(runner.finish().flushes, 0);
    }

    #[test]
    fn run_fallible_stops_at_first_source_error() {
        let input = format!("{INPUT}{{\"type\":\"nope\"}}\n{INPUT}");
        let mut runner = Runner::new(RunnerConfig::default());
        crate::bind!(*runner.handler_mut(), NodeCounter::default());

        let err = runner.run_fallible(JsonLines::new(input.as_bytes())).unwrap_err();
        match err {
            OsmError::Decode { line, .. } => assert_eq!(line, 6),
            other => panic!("Expected decode error, got {other:?}"),
        }
        assert_eq!(runner.stats().objects(), 5);
        assert_eq!(runner.stats().flushes, 0);
    }

    #[test]
    fn unbound_runner_still_counts() {
        let mut runner = Runner::default();
        runner.run(&test_objects());
        assert_eq!(runner.finish().objects(), 5);
    }

    #[test]
    fn apply_dispatches_and_flushes_once() {
        let seen: Rc<RefCell<Vec<String>>> = Rc::default();
        let log = seen.clone();
        let mut handler = DynamicHandler::new();
        crate::bind!(handler, move |way: &Way| log.borrow_mut().push(way.id.to_string()));

        let stats = apply(&mut handler, &test_objects());

        assert_eq!(stats.ways, 1);
        assert_eq!(stats.flushes, 1);
        assert_eq!(*seen.borrow(), vec!["10".to_string()]);
        assert!(handler.is_bound());
    }

    /// Records every category it sees, in order.
    struct Recorder {
        seen: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Visit<Node> for Recorder {
        fn visit(&mut self, _: &Node) {
            self.seen.borrow_mut().push("node");
        }
    }

    impl Visit<Way> for Recorder {
        fn visit(&mut self, _: &Way) {
            self.seen.borrow_mut().push("way");
        }
    }

    impl Visit<Changeset> for Recorder {
        fn visit(&mut self, _: &Changeset) {
            self.seen.borrow_mut().push("changeset");
        }
    }

    impl Visit<Flush> for Recorder {
        fn visit(&mut self, _: &Flush) {
            self.seen.borrow_mut().push("flush");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: a callable consumer sees exactly the routed sequence, in order,
        /// and stats match the per-category counts of the input.
        #[test]
        fn callable_consumer_sees_input_sequence(picks in prop::collection::vec(0usize..5, 0..40)) {
            let pool = test_objects();
            let objects: Vec<OsmObject> = picks.iter().map(|i| pool[*i].clone()).collect();

            let seen: Rc<RefCell<Vec<&'static str>>> = Rc::default();
            let mut runner = Runner::new(RunnerConfig::default());
            crate::bind!(*runner.handler_mut(), Recorder { seen: seen.clone() });

            runner.run(&objects);
            let stats = runner.finish();

            let mut expected: Vec<&'static str> = objects
                .iter()
                .filter_map(|o| match o {
                    OsmObject::Node(_) => Some("node"),
                    OsmObject::Way(_) => Some("way"),
                    OsmObject::Changeset(_) => Some("changeset"),
                    _ => None,
                })
                .collect();
            expected.push("flush");

            prop_assert_eq!(&*seen.borrow(), &expected);
            prop_assert_eq!(stats.objects(), objects.len() as u64);
        }
    }
}
