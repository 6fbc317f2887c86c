use std::io::Cursor;

use api_types::{
    category::CategoryView, person::PersonView, transaction::TransactionView,
};
use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use chrono::NaiveDate;

use engine::{
    Category, Directory, EngineError, LoadMore, Person, Purpose, Transaction, TransactionFilter,
    TransactionKind, aggregate, cumulative,
    export::{self, CATEGORY_SHEET, PEOPLE_SHEET, TRANSACTION_SHEET},
    filter_transactions,
};

fn wire_people() -> Vec<PersonView> {
    ["Ana", "Bruno", "Carla"]
        .iter()
        .enumerate()
        .map(|(i, name)| PersonView {
            id: i as i64 + 1,
            name: name.to_string(),
            age: 20 + i as i64,
        })
        .collect()
}

fn wire_categories() -> Vec<CategoryView> {
    vec![
        CategoryView {
            id: 1,
            description: "Mercado".to_string(),
            purpose: Purpose::Expense,
        },
        CategoryView {
            id: 2,
            description: "Salário".to_string(),
            purpose: Purpose::Income,
        },
    ]
}

/// 37 transactions spread over people 1..=4 (4 is unknown) and two months.
fn wire_transactions() -> Vec<TransactionView> {
    (0..37)
        .map(|i: i64| {
            let income = i % 3 == 0;
            TransactionView {
                id: i + 1,
                description: if income {
                    format!("Pagamento {i}")
                } else {
                    format!("Compra {i}")
                },
                amount: 10.5 + i as f64,
                kind: if income {
                    TransactionKind::Income
                } else {
                    TransactionKind::Expense
                },
                category_id: if income { 2 } else { 1 },
                person_id: i % 4 + 1,
                due_date: format!("2026-0{}-{:02}T00:00:00", 1 + i % 2, 1 + i % 28),
                paid: i % 2 == 0,
            }
        })
        .collect()
}

fn load() -> (Vec<Person>, Vec<Category>, Vec<Transaction>) {
    let people = wire_people()
        .into_iter()
        .map(Person::try_from)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let categories = wire_categories().into_iter().map(Category::from).collect();
    let transactions = wire_transactions()
        .into_iter()
        .map(Transaction::try_from)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    (people, categories, transactions)
}

fn read_sheet(bytes: Vec<u8>, sheet: &str) -> calamine::Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    workbook.worksheet_range(sheet).unwrap()
}

#[test]
fn filter_results_are_a_matching_subsequence() {
    let (people, categories, transactions) = load();
    let directory = Directory::new(&people, &categories);

    for term in ["", "a", "ANA", "mercado", "pagamento 3", "zzz", "sal"] {
        let filter = TransactionFilter::new(term);
        let out = filter_transactions(&transactions, &directory, &filter);

        // Subsequence of the input, in order.
        let mut cursor = transactions.iter();
        for item in &out {
            assert!(cursor.any(|tx| tx.id == item.id), "order broken for {term:?}");
        }

        let needle = term.to_lowercase();
        for tx in &out {
            let person = directory.person_name(tx.person_id).unwrap_or_default();
            let category = directory
                .category_description(tx.category_id)
                .unwrap_or_default();
            assert!(
                tx.description.to_lowercase().contains(&needle)
                    || person.to_lowercase().contains(&needle)
                    || category.to_lowercase().contains(&needle)
            );
        }

        let again = filter_transactions(out.iter().copied(), &directory, &filter);
        assert_eq!(again, out, "filter is not idempotent for {term:?}");
    }
}

#[test]
fn date_filter_and_pagination_compose() {
    let (people, categories, transactions) = load();
    let directory = Directory::new(&people, &categories);
    let filter = TransactionFilter::default()
        .from(NaiveDate::from_ymd_opt(2026, 2, 1))
        .to(NaiveDate::from_ymd_opt(2026, 2, 28));

    let out = filter_transactions(&transactions, &directory, &filter);
    assert_eq!(out.len(), 18);
    assert!(out.iter().all(|tx| tx.due_date.format("%m").to_string() == "02"));

    let mut pages = LoadMore::new(10);
    assert_eq!(pages.visible(&out).len(), 10);
    pages.advance();
    assert_eq!(pages.visible(&out).len(), 18);
    assert!(!pages.has_more(out.len()));
    assert_eq!(cumulative(&out, 9, 10).len(), 18);
}

#[test]
fn aggregation_matches_grand_total_invariants() {
    let (people, _, transactions) = load();
    let totals = aggregate(&transactions, &people).unwrap();

    assert_eq!(
        totals.grand.balance,
        totals.grand.total_income - totals.grand.total_expense
    );
    assert_eq!(totals.per_person.len(), 3);

    let income: i64 = totals.per_person.iter().map(|p| p.total_income.cents()).sum();
    let expense: i64 = totals.per_person.iter().map(|p| p.total_expense.cents()).sum();
    // Person 4 is unknown: its transactions only reach the grand total.
    assert!(income < totals.grand.total_income.cents());
    assert!(expense < totals.grand.total_expense.cents());

    let all_known = aggregate(
        &transactions
            .iter()
            .filter(|tx| tx.person_id != 4)
            .cloned()
            .collect::<Vec<_>>(),
        &people,
    )
    .unwrap();
    let income: i64 = all_known.per_person.iter().map(|p| p.total_income.cents()).sum();
    assert_eq!(income, all_known.grand.total_income.cents());
}

#[test]
fn accepted_records_with_huge_amounts_fail_aggregation() {
    let (people, _, _) = load();
    let huge: Vec<Transaction> = wire_transactions()
        .into_iter()
        .take(2)
        .map(|mut view| {
            view.amount = 6.0e16;
            view.kind = TransactionKind::Income;
            Transaction::try_from(view)
        })
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(aggregate(&huge, &people), Err(EngineError::AmountOverflow));
}

#[test]
fn empty_export_still_has_a_header_row() {
    let table = export::transactions_table(std::iter::empty(), &Directory::default());
    let file = table.export(engine::ExportFormat::Xlsx, "empty").unwrap();
    assert_eq!(file.file_name, "empty.xlsx");

    let range = read_sheet(file.bytes, TRANSACTION_SHEET);
    assert_eq!(range.height(), 1);
    assert_eq!(range.get((0, 0)), Some(&Data::String("DATA".to_string())));
    assert_eq!(range.get((0, 5)), Some(&Data::String("STATUS".to_string())));
}

#[test]
fn exported_transactions_round_trip_through_a_reader() {
    let (people, categories, transactions) = load();
    let directory = Directory::new(&people, &categories);
    let filter = TransactionFilter::new("pagamento");
    let mut rows = filter_transactions(&transactions, &directory, &filter);
    rows.reverse();

    let table = export::transactions_table(rows.iter().copied(), &directory);
    let range = read_sheet(export::encode_xlsx(&table).unwrap(), TRANSACTION_SHEET);

    assert_eq!(range.height(), rows.len() + 1);
    let newest = rows[0];
    assert_eq!(
        range.get((1, 1)),
        Some(&Data::String(newest.description.to_uppercase()))
    );
    assert_eq!(
        range.get((1, 4)),
        Some(&Data::Float(newest.amount.to_major()))
    );
}

#[test]
fn people_and_category_sheets_use_their_schemas() {
    let (people, categories, _) = load();

    let range = read_sheet(
        export::encode_xlsx(&export::people_table(&people)).unwrap(),
        PEOPLE_SHEET,
    );
    assert_eq!(range.height(), 4);
    assert_eq!(range.get((0, 1)), Some(&Data::String("IDADE".to_string())));
    assert_eq!(range.get((1, 0)), Some(&Data::String("Ana".to_string())));
    assert_eq!(range.get((1, 1)), Some(&Data::Float(20.0)));

    let range = read_sheet(
        export::encode_xlsx(&export::categories_table(&categories)).unwrap(),
        CATEGORY_SHEET,
    );
    assert_eq!(range.get((2, 1)), Some(&Data::String("Receita".to_string())));
}
