//! BDD scenarios for the client flows, driven through a scripted transport.

use serde_json::json;
use sdu_core::api::endpoints;
use sdu_core::flows::{check_existing_session, LoginFlow, SearchFlow, UploadFlow};
use sdu_core::reference;
use sdu_core::transport::{HttpResponse, Method};
use sdu_core::upload::AttachedFile;
use sdu_core::{ApiClient, DocumentKind, Screen, ScriptedTransport, Session};

fn client() -> (ApiClient<ScriptedTransport>, ScriptedTransport) {
    let transport = ScriptedTransport::new();
    (ApiClient::new(transport.clone()), transport)
}

#[test]
fn bdd_scenario_login_after_failed_session_check_reaches_dashboard() {
    // GIVEN a backend that reports no existing session and accepts admin/admin
    let (api, transport) = client();
    transport
        .reply(Method::Get, endpoints::CHECK_LOGIN, HttpResponse::new(401, "{}"))
        .reply(
            Method::Post,
            endpoints::LOGIN,
            HttpResponse::json(200, &json!({"status": "ok"})),
        );
    let mut session = Session::new();

    // WHEN the client starts
    check_existing_session(&api, &mut session);

    // THEN the login screen is shown
    assert!(!session.is_authenticated());
    assert_eq!(session.screen(), Screen::Login);

    // WHEN the user submits admin/admin
    let mut login = LoginFlow::new();
    login.username = "admin".into();
    login.password = "admin".into();
    login.submit(&api, &mut session);

    // THEN the session is authenticated and the dashboard renders
    assert!(session.is_authenticated());
    assert_eq!(session.screen(), Screen::Dashboard);
    assert_eq!(login.error(), None);
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn bdd_scenario_existing_session_skips_login() {
    // GIVEN a backend with a live session cookie
    let (api, transport) = client();
    transport.reply(
        Method::Get,
        endpoints::CHECK_LOGIN,
        HttpResponse::json(200, &json!({"status": "success", "message": "user already logged in"})),
    );
    let mut session = Session::new();

    // WHEN the client starts
    check_existing_session(&api, &mut session);

    // THEN no credentials are needed
    assert!(session.is_authenticated());
    assert_eq!(session.screen(), Screen::Dashboard);
}

#[test]
fn bdd_scenario_search_400_is_no_results_without_error() {
    // GIVEN a search endpoint answering 400
    let (api, transport) = client();
    transport.reply(
        Method::Get,
        endpoints::SEARCH_EXAM,
        HttpResponse::json(400, &json!({"Error": "no exams"})),
    );

    // WHEN the user searches
    let mut search = SearchFlow::new();
    search.query = "12345678900".into();
    search.search(&api);

    // THEN the list is empty and the flow is idle, not in an error state
    assert!(search.results().is_empty());
    assert!(search.has_searched());
    assert!(!search.is_busy());
}

#[test]
fn bdd_scenario_search_returns_exact_rows_then_download() {
    // GIVEN a search endpoint with two exams and a download endpoint
    let (api, transport) = client();
    transport
        .reply(
            Method::Get,
            endpoints::SEARCH_EXAM,
            HttpResponse::json(
                200,
                &json!({"exames": [
                    {"id": 10, "cpf": "12345678900", "tipo": "Hemograma", "data": "2024-01-15T09:00:00Z"},
                    {"id": 11, "cpf": "12345678900", "tipo": "Eletrocardiograma", "data": "2024-01-14T09:00:00Z"}
                ]}),
            ),
        )
        .reply(
            Method::Get,
            endpoints::DOWNLOAD_EXAM,
            HttpResponse::json(200, &json!({"url": "https://bucket.s3/uploads/abc.pdf?sig=1"})),
        );

    // WHEN the user searches and opens the second row
    let mut search = SearchFlow::new();
    search.query = "12345678900".into();
    search.search(&api);
    search.select_next();
    let url = search.download_selected(&api);

    // THEN rows keep server order and the link targets the selected exam
    let ids: Vec<u64> = search.results().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![10, 11]);
    assert_eq!(search.results()[1].display_date(), "14/01/2024");
    assert_eq!(url.as_deref(), Some("https://bucket.s3/uploads/abc.pdf?sig=1"));
    assert_eq!(transport.requests()[1].query_value("id"), Some("11"));
}

#[test]
fn bdd_scenario_malformed_search_body_yields_empty_list() {
    let (api, transport) = client();
    transport.reply(
        Method::Get,
        endpoints::SEARCH_EXAM,
        HttpResponse::json(200, &json!({"exams": [{"id": 1}]})),
    );
    let mut search = SearchFlow::new();
    search.query = "12345678900".into();
    search.search(&api);
    assert!(search.results().is_empty());
    assert_eq!(transport.requests()[0].query_value("cpf"), Some("12345678900"));
}

#[test]
fn bdd_scenario_blank_search_sends_nothing() {
    // GIVEN a query of only spaces
    let (api, transport) = client();
    let mut search = SearchFlow::new();
    search.query = "   ".into();

    // WHEN the user searches
    search.search(&api);

    // THEN no request is made and the list settles empty
    assert_eq!(transport.request_count(), 0);
    assert!(search.results().is_empty());
    assert!(search.has_searched());
    assert!(!search.is_busy());
}

#[test]
fn bdd_scenario_diagnostic_upload_needs_result_exam_does_not() {
    // GIVEN two otherwise-identical forms without result text
    let (api, transport) = client();
    transport.reply(
        Method::Post,
        endpoints::UPLOAD_EXAM,
        HttpResponse::json(200, &json!({"Success": "File saved successfully"})),
    );

    let fill = |flow: &mut UploadFlow, kind| {
        flow.set_patient_name("Ana Costa");
        flow.set_taxpayer_id("789.123.456-00");
        flow.set_document_kind(Some(kind));
        flow.set_description("Diabetes Mellitus Tipo 2");
        flow.attach(Some(AttachedFile::new("scan.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00])));
    };

    // WHEN the diagnostic is submitted
    let mut diagnostic = UploadFlow::new();
    fill(&mut diagnostic, DocumentKind::Diagnostic);
    diagnostic.submit(&api);

    // THEN it is rejected locally, nothing is sent
    assert_eq!(diagnostic.error(), Some("result is required for diagnostics"));
    assert_eq!(transport.request_count(), 0);

    // WHEN the exam is submitted
    let mut exam = UploadFlow::new();
    fill(&mut exam, DocumentKind::Exam);
    exam.submit(&api);

    // THEN it is accepted and the form resets
    assert!(exam.succeeded());
    assert_eq!(transport.request_count(), 1);
    assert_eq!(transport.requests()[0].field_value("cpf"), Some("78912345600"));
}

#[test]
fn bdd_scenario_reference_lookup_is_offline() {
    assert_eq!(reference::lookup("i10"), reference::lookup("I10"));
    assert_eq!(reference::lookup("j44").map(|e| e.case_count), Some(543));
    assert!(reference::lookup("Z99").is_none());
}

#[test]
fn bdd_scenario_logout_returns_to_login() {
    let mut session = Session::new();
    session.login();
    session.navigate(Screen::Reference);
    session.logout();
    assert_eq!(session.screen(), Screen::Login);
    assert!(!session.navigate(Screen::Dashboard));
}
