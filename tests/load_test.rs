//! Load testing for the validation endpoint.

use std::time::{Duration, Instant};

use disposable_webhook::lifecycle::Shutdown;
use serde_json::json;

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_load_performance() {
    // 1. Domain list source
    let list: String = (0..10_000).map(|i| format!("disposable{}.test\n", i)).collect();
    let source = common::start_list_server("/deny.txt", &list, None).await;

    // 2. Load the cache
    let cache = common::http_cache(vec![format!("{}/deny.txt", source.uri())]);
    cache.refresh().await.unwrap();
    assert_eq!(cache.domain_count(), 10_000);

    // 3. Start the webhook
    let shutdown = Shutdown::new();
    let addr = common::spawn_server(cache.clone(), &shutdown).await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    // 4. Run load, with a refresh racing the lookups
    let concurrency = 20;
    let requests_per_task = 50;
    let total_requests = concurrency * requests_per_task;

    let client = common::client();
    let start = Instant::now();

    let refresher = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.refresh().await.is_ok() })
    };

    let mut tasks = Vec::new();
    for t in 0..concurrency {
        let client = client.clone();
        let url = format!("http://{}/v1/validate/email", addr);
        tasks.push(tokio::spawn(async move {
            let mut latencies = Vec::new();
            for i in 0..requests_per_task {
                // Alternate between listed and unlisted domains.
                let (email, expected) = if i % 2 == 0 {
                    (format!("u{}@disposable{}.test", t, i), 400)
                } else {
                    (format!("u{}@example{}.org", t, i), 200)
                };
                let req_start = Instant::now();
                if let Ok(res) = client
                    .post(&url)
                    .header("x-api-key", common::API_KEY)
                    .json(&json!({ "email": email }))
                    .send()
                    .await
                {
                    if res.status().as_u16() == expected {
                        latencies.push(req_start.elapsed());
                    }
                }
            }
            latencies
        }));
    }

    let mut all_latencies = Vec::new();
    for task in tasks {
        all_latencies.extend(task.await.unwrap());
    }
    assert!(refresher.await.unwrap(), "concurrent refresh should succeed");

    let duration = start.elapsed();
    let rps = total_requests as f64 / duration.as_secs_f64();

    assert_eq!(all_latencies.len(), total_requests, "every verdict should be correct");

    all_latencies.sort();
    let p50 = all_latencies[all_latencies.len() / 2];
    let p95 = all_latencies[(all_latencies.len() as f64 * 0.95) as usize];
    let p99 = all_latencies[(all_latencies.len() as f64 * 0.99) as usize];

    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("Requests/sec:   {:.2}", rps);
    println!("P50 Latency:    {:?}", p50);
    println!("P95 Latency:    {:?}", p95);
    println!("P99 Latency:    {:?}", p99);
    println!("-------------------------\n");

    shutdown.trigger();
}
