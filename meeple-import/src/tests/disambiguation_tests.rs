use std::thread;

use meeple_core::CollectionEntry;

use super::*;

fn record() -> SourceRecord {
    SourceRecord::Collection(CollectionEntry {
        game_name: "Azul".to_string(),
        ownership: Default::default(),
        year_published: Some(2017),
    })
}

fn candidates() -> Vec<DestinationCandidate> {
    vec![
        DestinationCandidate::new("1", "Azul", Some("2010".into())),
        DestinationCandidate::new("2", "Azul", Some("2015".into())),
    ]
}

/// Runs `answer` on a separate thread for every request that arrives.
fn with_responder<F>(answer: F) -> (DisambiguationChannel, thread::JoinHandle<usize>)
where
    F: Fn(&DisambiguationRequest) -> Option<Answer> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let responder = thread::spawn(move || {
        let mut served = 0;
        for msg in rx {
            if let PipelineMessage::Disambiguate(pending) = msg {
                served += 1;
                // `None` drops the request without answering.
                if let Some(a) = answer(&pending.request) {
                    pending.respond(a);
                }
            }
        }
        served
    });
    (DisambiguationChannel::new(tx), responder)
}

#[test]
fn choice_is_delivered_across_threads() {
    let (mut channel, responder) = with_responder(|req| match req {
        DisambiguationRequest::Choose {
            record_label,
            candidates,
            researched,
        } => {
            assert!(!researched);
            assert_eq!(record_label, "Azul (2017)");
            assert_eq!(candidates.len(), 2);
            Some(Answer::Choice(1))
        }
        DisambiguationRequest::Research { .. } => Some(Answer::Declined),
    });

    let chosen = channel.choose(&record(), &candidates(), false).unwrap();
    assert_eq!(chosen.map(|c| c.destination_id), Some("2".to_string()));
    drop(channel);
    assert_eq!(responder.join().unwrap(), 1);
}

#[test]
fn research_returns_trimmed_query() {
    let (mut channel, _responder) = with_responder(|_| Some(Answer::Query("  Azul  ".into())));
    assert_eq!(channel.research(&record()).unwrap().as_deref(), Some("Azul"));
}

#[test]
fn blank_query_counts_as_declined() {
    let (mut channel, _responder) = with_responder(|_| Some(Answer::Query("   ".into())));
    assert_eq!(channel.research(&record()).unwrap(), None);
}

#[test]
fn declined_and_out_of_range_yield_none() {
    let (mut channel, _responder) = with_responder(|req| match req {
        DisambiguationRequest::Choose { .. } => Some(Answer::Choice(7)),
        DisambiguationRequest::Research { .. } => Some(Answer::Declined),
    });
    assert_eq!(channel.choose(&record(), &candidates(), false).unwrap(), None);
    assert_eq!(channel.research(&record()).unwrap(), None);
}

#[test]
fn dropped_request_cancels() {
    let (mut channel, _responder) = with_responder(|_| None);
    assert!(matches!(
        channel.choose(&record(), &candidates(), false),
        Err(ImportError::Cancelled)
    ));
}

#[test]
fn abort_cancels() {
    let (mut channel, _responder) = with_responder(|_| Some(Answer::Abort));
    assert!(matches!(channel.research(&record()), Err(ImportError::Cancelled)));
}

#[test]
fn closed_interaction_thread_cancels() {
    let (tx, rx) = mpsc::channel();
    drop(rx);
    let mut channel = DisambiguationChannel::new(tx);
    assert!(matches!(channel.research(&record()), Err(ImportError::Cancelled)));
}

#[test]
fn declining_never_blocks() {
    let mut d = Declining;
    assert_eq!(d.research(&record()).unwrap(), None);
    assert_eq!(d.choose(&record(), &candidates(), true).unwrap(), None);
}
