extern crate sys_info;

use actix_web::{get, web, HttpResponse};
use chrono::Utc;

use crate::endpoints::SharedHandles;
use crate::similarity::NUM_SOUNDS_TO_RECOMMEND;
use web::Data;

#[get("/ping")]
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().body("pong")
}

#[get("/internal")]
pub async fn internal(handles: Data<SharedHandles>) -> HttpResponse {
    let mut html = "<html>sound-recommender: attribute based sound recommendations.<br />".to_string();

    let graph = handles.catalog.recommender().graph();
    html.push_str("<h3>Similarity graph</h3>");
    html.push_str("Qty indexed sounds: ");
    html.push_str(&graph.len().to_string());
    html.push_str("<br />Qty sounds to recommend: ");
    html.push_str(&NUM_SOUNDS_TO_RECOMMEND.to_string());
    html.push_str("<br />Started at: ");
    html.push_str(&handles.started_at.to_string());
    html.push_str("<br />Uptime (hours): ");

    let uptime_hours = (Utc::now().naive_utc() - handles.started_at).num_hours();

    html.push_str(&uptime_hours.to_string());
    html.push_str("<br /><a href=\"/sounds\">all sounds</a>");
    html.push_str("<h3>Machine instance</h3>");
    html.push_str("<br />Qty CPU's detected: ");
    html.push_str(&sys_info::cpu_num().unwrap_or(0).to_string());
    html.push_str("<br />Qty actix workers set: ");
    html.push_str(&handles.qty_workers.to_string());
    html.push_str("<br />CPU speed: ");
    html.push_str(&sys_info::cpu_speed().unwrap_or(0).to_string());
    html.push_str("MHz");
    html.push_str("<br />Active processes on instance: ");
    html.push_str(&sys_info::proc_total().unwrap_or(0).to_string());
    html.push_str("<h3>Metrics</h3>");
    html.push_str("<a href=\"/internal/prometheus\">prometheus</a>");
    html.push_str("</html>");

    HttpResponse::Ok().body(html)
}

#[cfg(test)]
mod index_resource_test {
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};

    use crate::catalog::catalog_test::creation;
    use crate::endpoints::test_support::{call, test_handles};

    #[actix_rt::test]
    async fn should_answer_ping() {
        let (_directory, handles) = test_handles();
        let response = call(&handles, TestRequest::get().uri("/ping")).await;

        assert_eq!(StatusCode::OK, response.status());
        let body = test::read_body(response).await;
        assert_eq!(&b"pong"[..], &body[..]);
    }

    #[actix_rt::test]
    async fn should_report_graph_size() {
        let (_directory, handles) = test_handles();
        handles
            .catalog
            .create_sounds(vec![
                creation(120.0, "rock", 200.0, "X"),
                creation(90.0, "jazz", 300.0, "Z"),
            ])
            .unwrap();

        let response = call(&handles, TestRequest::get().uri("/internal")).await;

        assert_eq!(StatusCode::OK, response.status());
        let body = test::read_body(response).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Qty indexed sounds: 2"));
    }
}
