mod common;

use common::*;
use meeple_import::{
    Answer, DisambiguationRequest, ImportError, ImportEvent, ImportPipeline, PipelineMessage,
    UserIdentityMap, spawn_pipeline,
};

fn ambiguous_catalog() -> FakeCatalog {
    FakeCatalog::default().with_results(
        "Azul",
        vec![
            candidate("10", "Azul", Some("2010")),
            candidate("15", "Azul", Some("2015")),
        ],
    )
}

#[test]
fn interaction_thread_answers_choice() {
    let handle = spawn_pipeline(|ctx| {
        let catalog = ambiguous_catalog();
        let mut human = ctx.disambiguator();
        let progress = ctx.progress();
        let summary = ImportPipeline::new(&catalog, &mut human, &progress)
            .with_cancel(ctx.cancel.clone())
            .run(
                fetched(vec![entry("Azul", Some(2017)), entry("Azul", Some(2017))]),
                "alice",
                &UserIdentityMap::new(),
            )?;
        assert_eq!(catalog.collection_writes.borrow()[0].0, "15");
        Ok(summary)
    });

    let mut requests = 0;
    let mut saw_done = false;
    for msg in handle.messages() {
        match msg {
            PipelineMessage::Disambiguate(pending) => {
                requests += 1;
                match &pending.request {
                    DisambiguationRequest::Choose { candidates, .. } => {
                        assert_eq!(candidates.len(), 2)
                    }
                    other => panic!("unexpected request {other:?}"),
                }
                pending.respond(Answer::Choice(1));
            }
            PipelineMessage::Event(ImportEvent::Done { .. }) => saw_done = true,
            PipelineMessage::Event(_) => {}
        }
    }

    let summary = handle.join().unwrap();
    assert_eq!(summary.ratio(), "2/2");
    // The second record hits the cache, so only one question is asked.
    assert_eq!(requests, 1);
    assert!(saw_done);
}

#[test]
fn dropping_a_request_cancels_the_run() {
    let handle = spawn_pipeline(|ctx| {
        let catalog = ambiguous_catalog();
        let mut human = ctx.disambiguator();
        let progress = ctx.progress();
        ImportPipeline::new(&catalog, &mut human, &progress).run(
            fetched(vec![entry("Azul", None)]),
            "alice",
            &UserIdentityMap::new(),
        )
    });

    let mut fatal = None;
    for msg in handle.messages() {
        match msg {
            PipelineMessage::Disambiguate(pending) => drop(pending),
            PipelineMessage::Event(ImportEvent::FatalError { message }) => fatal = Some(message),
            PipelineMessage::Event(_) => {}
        }
    }

    assert!(matches!(handle.join(), Err(ImportError::Cancelled)));
    assert_eq!(fatal.as_deref(), Some("Import cancelled"));
}

#[test]
fn abort_answer_cancels_the_run() {
    let handle = spawn_pipeline(|ctx| {
        let catalog = FakeCatalog::default();
        let mut human = ctx.disambiguator();
        let progress = ctx.progress();
        ImportPipeline::new(&catalog, &mut human, &progress).run(
            fetched(vec![entry("Missing", None), entry("Missing too", None)]),
            "alice",
            &UserIdentityMap::new(),
        )
    });

    let mut asked = 0;
    for msg in handle.messages() {
        if let PipelineMessage::Disambiguate(pending) = msg {
            asked += 1;
            pending.respond(Answer::Abort);
        }
    }

    assert!(matches!(handle.join(), Err(ImportError::Cancelled)));
    assert_eq!(asked, 1);
}

#[test]
fn join_without_draining_does_not_deadlock() {
    let handle = spawn_pipeline(|ctx| {
        let catalog = ambiguous_catalog();
        let mut human = ctx.disambiguator();
        let progress = ctx.progress();
        ImportPipeline::new(&catalog, &mut human, &progress).run(
            fetched(vec![entry("Azul", None)]),
            "alice",
            &UserIdentityMap::new(),
        )
    });

    assert!(matches!(handle.join(), Err(ImportError::Cancelled)));
}

#[test]
fn panicking_pipeline_is_reported() {
    let handle = spawn_pipeline(|_ctx| panic!("boom"));
    assert!(matches!(handle.join(), Err(ImportError::Panicked)));
}
