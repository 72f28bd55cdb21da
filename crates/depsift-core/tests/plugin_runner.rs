//! Plugin runner ordering, merging and fail-fast behavior.

use async_trait::async_trait;
use depsift_core::{
    AnalysisContext, Error, Message, PackageJson, PluginOutput, PluginRunner, ReportPlugin,
    ResolvedConfig, Severity, Stat, StatValue, StatsPatch,
};
use depsift_fs::MemoryFileSystem;
use depsift_lockfile::{LockGraph, LockfileKind, ParsedLockfile};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Emit {
    name: &'static str,
    stat: Option<(&'static str, usize)>,
    message: Option<&'static str>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ReportPlugin for Emit {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(&self, context: &AnalysisContext) -> depsift_core::Result<PluginOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Earlier plugins are visible through the context
        let seen_before = context.messages.len();

        Ok(PluginOutput {
            stats: Some(StatsPatch {
                name: Some(format!("{}-{seen_before}", self.name)),
                extra_stats: self
                    .stat
                    .map(|(name, value)| vec![Stat::new(name, name, value)])
                    .unwrap_or_default(),
                ..Default::default()
            }),
            messages: self
                .message
                .map(|text| vec![Message::new(Severity::Warning, text)])
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug)]
struct Fail;

#[async_trait]
impl ReportPlugin for Fail {
    fn name(&self) -> &str {
        "fail"
    }

    async fn run(&self, _context: &AnalysisContext) -> depsift_core::Result<PluginOutput> {
        Err(Error::MissingInput {
            artifact: "package.json".to_string(),
            searched: "/nowhere".into(),
        })
    }
}

fn context() -> AnalysisContext {
    let lockfile = ParsedLockfile::from_graph(LockfileKind::Npm, LockGraph::new("app", "1.0.0"));
    AnalysisContext::new(
        Arc::new(MemoryFileSystem::empty("/project")),
        PackageJson::default(),
        lockfile,
        ResolvedConfig::default(),
    )
}

fn emit(
    name: &'static str,
    stat: Option<(&'static str, usize)>,
    message: Option<&'static str>,
    calls: &Arc<AtomicUsize>,
) -> Box<dyn ReportPlugin> {
    Box::new(Emit {
        name,
        stat,
        message,
        calls: Arc::clone(calls),
    })
}

#[tokio::test]
async fn test_plugins_fold_in_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut runner = PluginRunner::new();
    runner.register(emit("first", Some(("size", 1)), Some("same"), &calls));
    runner.register(emit("second", Some(("size", 2)), Some("same"), &calls));

    let mut context = context();
    runner.run(&mut context).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    // Last scalar write wins, and saw the first plugin's message
    assert_eq!(context.stats.name, "second-1");
    // First extra stat writer wins
    assert_eq!(context.stats.extra_stats.len(), 1);
    assert_eq!(context.stats.extra_stats[0].value, StatValue::from(1usize));
    // Identical messages are preserved
    let texts: Vec<_> = context.messages.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(texts, vec!["same", "same"]);
}

#[tokio::test]
async fn test_initial_extra_stats_are_never_replaced() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut runner = PluginRunner::new();
    runner.register(emit("plugin", Some(("preset", 7)), None, &calls));

    let mut context = context();
    context.stats.extra_stats.push(Stat::new("preset", "Preset", 3usize));
    runner.run(&mut context).await.unwrap();

    assert_eq!(context.stats.extra_stats.len(), 1);
    assert_eq!(context.stats.extra_stats[0].value, StatValue::from(3usize));
}

#[tokio::test]
async fn test_plugin_failure_stops_the_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut runner = PluginRunner::new();
    runner.register(emit("before", None, Some("kept"), &calls));
    runner.register(Box::new(Fail));
    runner.register(emit("after", None, Some("never"), &calls));

    let mut context = context();
    let err = runner.run(&mut context).await.unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    match err {
        Error::Plugin { plugin, source } => {
            assert_eq!(plugin, "fail");
            assert!(matches!(*source, Error::MissingInput { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}
