use chrono_tz::UTC;
use scoreviz_core::{
    FilterState, MatchDataSession, ParseOptions, PipelineOptions, PipelineRequest,
    PipelineResponse, PipelineWorker, RawInput, WorkerError,
};
use tokio::sync::mpsc;

const SEASON: &str = "Home/Neutral,Visitor/Neutral,PTS,PTS,Date,Start (ET)\n\
                      Lakers,Celtics,100,98,Dec 1 2023,9:00 pm\n\
                      Heat,Lakers,101,99,Dec 3 2023,7:30 pm\n";

fn start_worker() -> (PipelineWorker, mpsc::UnboundedReceiver<PipelineResponse>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let options = PipelineOptions {
        parse: ParseOptions { timezone: UTC },
        ..PipelineOptions::default()
    };
    let worker = PipelineWorker::start(options, 4, move |response| {
        let _ = tx.send(response);
    });
    (worker, rx)
}

#[tokio::test]
async fn answers_each_request_in_order() {
    let (worker, mut responses) = start_worker();

    let first = worker
        .post(PipelineRequest::new(SEASON, FilterState::new()))
        .await
        .unwrap();
    let second = worker
        .post(PipelineRequest::new(RawInput::Missing, FilterState::new()))
        .await
        .unwrap();
    assert!(second > first);

    let response = responses.recv().await.unwrap();
    assert_eq!(response.id, first);
    let result = response.result.unwrap();
    assert_eq!(result.match_list.len(), 2);
    assert_eq!(result.teams, ["Lakers", "Celtics", "Heat"]);

    let response = responses.recv().await.unwrap();
    assert_eq!(response.id, second);
    assert!(response.result.unwrap().is_empty());

    worker.stop().await.unwrap();
}

#[tokio::test]
async fn rejects_requests_after_stop() {
    let (worker, mut responses) = start_worker();
    assert!(worker.is_running());

    worker.stop().await.unwrap();
    assert!(!worker.is_running());
    worker.stop().await.unwrap();

    let err = worker.post(PipelineRequest::default()).await.unwrap_err();
    assert!(matches!(err, WorkerError::Stopped));
    assert!(responses.recv().await.is_none());
}

#[tokio::test]
async fn stop_drains_queued_requests() {
    let (worker, mut responses) = start_worker();
    for _ in 0..3 {
        worker
            .post(PipelineRequest::new(SEASON, FilterState::new()))
            .await
            .unwrap();
    }
    worker.stop().await.unwrap();

    let mut received = 0;
    while let Some(response) = responses.recv().await {
        assert!(response.result.is_ok());
        received += 1;
    }
    assert_eq!(received, 3);
}

#[tokio::test]
async fn session_keeps_only_the_latest_response() {
    let (worker, mut responses) = start_worker();
    let mut session = MatchDataSession::new(FilterState::new());

    let unfiltered = session.initialise(&worker, SEASON).await.unwrap();
    let filtered = session
        .set_filters(&worker, FilterState::new().teams(["Heat"]))
        .await
        .unwrap()
        .expect("raw data is loaded, so a run is queued");
    assert!(session.is_loading());

    let stale = responses.recv().await.unwrap();
    assert_eq!(stale.id, unfiltered);
    assert!(!session.accept(stale));
    assert!(session.data().is_none());
    assert!(!session.is_initialised());

    let fresh = responses.recv().await.unwrap();
    assert_eq!(fresh.id, filtered);
    assert!(session.accept(fresh));
    assert!(!session.is_loading());
    assert!(session.is_initialised());

    let data = session.data().unwrap();
    assert_eq!(data.team_series["Heat"].len(), 1);
    assert!(data.team_series["Lakers"].is_empty());
    assert!(data.team_series["Celtics"].is_empty());

    worker.stop().await.unwrap();
}

#[tokio::test]
async fn filters_without_data_do_not_post() {
    let (worker, _responses) = start_worker();
    let mut session = MatchDataSession::default();

    let posted = session
        .set_filters(&worker, FilterState::new().teams(["Lakers"]))
        .await
        .unwrap();

    assert!(posted.is_none());
    assert!(!session.is_loading());
    assert!(!session.filters().is_unrestricted());
    assert!(session.raw().is_empty());

    worker.stop().await.unwrap();
}
