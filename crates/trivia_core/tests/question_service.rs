use trivia_core::db::open_db_in_memory;
use trivia_core::{
    Category, CategoryCatalog, InMemoryTriviaStore, NewQuestion, PageRequest,
    QuestionService, QuestionValidationError, ServiceError, SqliteCategoryRepository,
    SqliteQuestionRepository,
};

fn seed(service: &QuestionService<&InMemoryTriviaStore, &InMemoryTriviaStore>, count: usize) {
    for n in 1..=count {
        service
            .create_question(&NewQuestion::new(format!("question {n}"), "answer", 1, 1))
            .unwrap();
    }
}

#[test]
fn pages_over_twenty_five_questions() {
    let store = InMemoryTriviaStore::new();
    let service = QuestionService::new(&store, &store);
    seed(&service, 25);

    let first = service.list_questions(PageRequest::default()).unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total_count, 25);
    assert_eq!(first.items[0].question, "question 25");

    let third = service
        .list_questions(PageRequest::new(Some(3), Some(10)))
        .unwrap();
    assert_eq!(third.items.len(), 5);
    assert_eq!(third.items[4].question, "question 1");

    let fourth = service
        .list_questions(PageRequest::new(Some(4), Some(10)))
        .unwrap();
    assert!(fourth.items.is_empty());
    assert_eq!(fourth.total_count, 25);
    assert!(fourth.is_out_of_range());
}

#[test]
fn total_count_tracks_changes_between_calls() {
    let store = InMemoryTriviaStore::new();
    let service = QuestionService::new(&store, &store);
    seed(&service, 3);
    assert_eq!(service.list_questions(PageRequest::default()).unwrap().total_count, 3);

    let newest = service.list_questions(PageRequest::default()).unwrap().items[0].id;
    service.delete_question(newest).unwrap();
    assert_eq!(service.list_questions(PageRequest::default()).unwrap().total_count, 2);
}

#[test]
fn create_rejects_unknown_category_before_writing() {
    let store = InMemoryTriviaStore::new();
    let service = QuestionService::new(&store, &store);

    let err = service
        .create_question(&NewQuestion::new("q", "a", 1, 77))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(QuestionValidationError::UnknownCategory(77))
    ));
    assert_eq!(service.list_questions(PageRequest::default()).unwrap().total_count, 0);
}

#[test]
fn create_rejects_missing_fields() {
    let store = InMemoryTriviaStore::new();
    let service = QuestionService::new(&store, &store);

    let err = service.create_question(&NewQuestion::default()).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(QuestionValidationError::MissingField("question"))
    ));
}

#[test]
fn delete_then_get_and_retry_report_not_found() {
    let store = InMemoryTriviaStore::new();
    let service = QuestionService::new(&store, &store);
    let question = service
        .create_question(&NewQuestion::new("q", "a", 1, 2))
        .unwrap();

    assert_eq!(service.get_question(question.id).unwrap(), question);
    service.delete_question(question.id).unwrap();

    assert!(matches!(
        service.get_question(question.id).unwrap_err(),
        ServiceError::NotFound(id) if id == question.id
    ));
    assert!(matches!(
        service.delete_question(question.id).unwrap_err(),
        ServiceError::NotFound(id) if id == question.id
    ));
}

#[test]
fn sqlite_backed_service_searches_and_lists_by_category() {
    let conn = open_db_in_memory().unwrap();
    let service = QuestionService::new(
        SqliteQuestionRepository::try_new(&conn).unwrap(),
        SqliteCategoryRepository::try_new(&conn).unwrap(),
    );
    service
        .create_question(&NewQuestion::new("Which Title won?", "a", 1, 4))
        .unwrap();
    service
        .create_question(&NewQuestion::new("Who discovered penicillin?", "b", 3, 1))
        .unwrap();

    let hits = service.search_questions("title").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].category, 4);
    assert_eq!(service.search_questions("").unwrap().len(), 2);
    assert_eq!(service.search_questions("   ").unwrap().len(), 2);
    assert!(service.search_questions("  title ").unwrap().is_empty());
    assert_eq!(service.search_questions("title ").unwrap().len(), 1);

    let science = service.questions_by_category(1).unwrap();
    assert_eq!(science.len(), 1);
    assert!(service.questions_by_category(99).unwrap().is_empty());
}

#[test]
fn catalog_maps_ids_to_labels() {
    let store = InMemoryTriviaStore::with_categories([
        Category::new(10, "Music"),
        Category::new(3, "Geography"),
    ]);
    let catalog = CategoryCatalog::new(&store);

    let all = catalog.list_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all.get(&10).map(String::as_str), Some("Music"));
    assert_eq!(all.get(&3).map(String::as_str), Some("Geography"));
    assert_eq!(catalog.get(10).unwrap(), Some(Category::new(10, "Music")));
    assert_eq!(catalog.get(11).unwrap(), None);
}
