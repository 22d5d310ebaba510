use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Days, NaiveDate};
use werkdesk_infra::export::tickets_to_csv;
use werkdesk_infra::persistence::{InMemoryKeyValueStore, KeyValuePersistence};
use werkdesk_infra::query::{FieldFilter, SortDirection, SortKey, SortState, TicketQuery};
use werkdesk_infra::store::RepairOrderStore;
use werkdesk_repairs::{NewTicket, Ticket, TicketId, TicketStatus};

const PARTNERS: [&str; 4] = ["Self (Admin)", "TechFix Co.", "GadgetPro", "RepairHub"];
const DEVICES: [&str; 4] = ["iPhone 13", "Samsung S22", "MacBook Pro", "Dell XPS 15"];

fn collection(size: usize) -> Vec<Ticket> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..size)
        .map(|i| {
            let mut ticket = Ticket::open(
                TicketId::new(format!("T{:03}", i + 1)),
                NewTicket {
                    customer: format!("Customer {i}"),
                    device: DEVICES[i % DEVICES.len()].to_string(),
                    price: Some((i % 37) as f64 * 12.5),
                    partner: Some(PARTNERS[i % PARTNERS.len()].to_string()),
                    ..NewTicket::default()
                },
                start.checked_add_days(Days::new((i % 365) as u64)).unwrap(),
            );
            ticket.status = TicketStatus::ALL[i % TicketStatus::ALL.len()];
            ticket
        })
        .collect()
}

fn bench_query_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_apply");

    for size in [100usize, 1_000, 10_000].iter() {
        let tickets = collection(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("default_view", size), &tickets, |b, tickets| {
            let query = TicketQuery::default();
            b.iter(|| black_box(query.apply(black_box(tickets))));
        });

        group.bench_with_input(BenchmarkId::new("search_filter_sort", size), &tickets, |b, tickets| {
            let query = TicketQuery {
                search: "samsung".to_string(),
                status: FieldFilter::Exact(TicketStatus::InProgress.as_str().to_string()),
                partner: FieldFilter::Exact("GadgetPro".to_string()),
                date: None,
                sort: SortState::new(SortKey::Price, SortDirection::Descending),
            };
            b.iter(|| black_box(query.apply(black_box(tickets))));
        });
    }

    group.finish();
}

fn bench_store_mutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_mutation");

    // Each mutation rewrites the whole collection, so cost grows with size.
    for size in [100usize, 1_000].iter() {
        group.bench_with_input(BenchmarkId::new("create_persist", size), size, |b, &size| {
            let persistence = KeyValuePersistence::new(InMemoryKeyValueStore::new(), "werkdeskTickets");
            let mut store = RepairOrderStore::with_tickets(persistence, collection(size));
            let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
            b.iter(|| {
                let ticket = store
                    .create(
                        NewTicket {
                            customer: black_box("Bench Customer".to_string()),
                            device: "Pixel 7".to_string(),
                            price: Some(99.0),
                            ..NewTicket::default()
                        },
                        today,
                    )
                    .unwrap();
                store.delete(&ticket.id).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_csv_export(c: &mut Criterion) {
    let tickets = collection(1_000);
    c.bench_function("tickets_to_csv_1000", |b| b.iter(|| black_box(tickets_to_csv(black_box(&tickets)))));
}

criterion_group!(benches, bench_query_apply, bench_store_mutation, bench_csv_export);
criterion_main!(benches);
