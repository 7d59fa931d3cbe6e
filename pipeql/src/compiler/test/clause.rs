mod coercion {
    use bson::doc;

    test_compile!(
        string_value,
        expected = Ok(vec![
            doc! {"$match": {"status": "Pending"}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_status=Pending",
    );

    test_compile!(
        numeric_value,
        expected = Ok(vec![
            doc! {"$match": {"id": 1, "price": 2.5}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_id=1,price=2.5",
    );

    test_compile!(
        boolean_value,
        expected = Ok(vec![
            doc! {"$match": {"published": true, "deleted": false}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_published=true,deleted=false",
    );

    test_compile!(
        quoted_phone_number_stays_a_string,
        expected = Ok(vec![
            doc! {"$match": {"phone": "13800138000"}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_phone='13800138000'",
    );

    test_compile!(
        unquoted_phone_number_is_a_long,
        expected = Ok(vec![
            doc! {"$match": {"phone": 13_800_138_000_i64}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_phone=13800138000",
    );

    test_compile!(
        empty_value,
        expected = Ok(vec![
            doc! {"$match": {"note": ""}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_note=",
    );

    test_compile!(
        keys_are_never_coerced,
        expected = Ok(vec![
            doc! {"$match": {"1": true}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_1=true",
    );

    test_compile!(
        field_reference_value,
        expected = Ok(vec![
            doc! {"$match": {"a": "$b"}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_a=$b",
    );

    test_compile!(
        quoted_dollar_is_literal,
        expected = Ok(vec![
            doc! {"$match": {"code": "a$b"}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_code='a$b'",
    );

    test_compile!(
        later_duplicate_key_wins,
        expected = Ok(vec![
            doc! {"$match": {"a": 2, "b": 1}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_a=1,b=1,a=2",
    );

    test_compile!(
        stray_commas_are_ignored,
        expected = Ok(vec![
            doc! {"$match": {"a": 1, "b": 2}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_a=1,,b=2,",
    );
}

mod dotted_paths {
    use bson::doc;

    test_compile!(
        dotted_value_becomes_reference,
        expected = Ok(vec![
            doc! {"$match": {"teacher": "$course.teacher_id"}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_teacher=course.teacher_id",
    );

    test_compile!(
        add_fields_dotted_value,
        expected = Ok(vec![
            doc! {"$addFields": {"title": "$course.title"}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "a_title=course.title",
    );

    test_compile!(
        quoted_dotted_value_is_literal,
        expected = Ok(vec![
            doc! {"$match": {"email": "a@b.com"}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_email='a@b.com'",
    );

    test_compile!(
        trailing_zero_decimals_are_numbers,
        expected = Ok(vec![
            doc! {"$match": {"price": 1.0, "cost": 10.5, "rate": 2.5}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_price=1.0,cost=10.50,rate=2.5",
    );

    test_compile!(
        imprecise_decimal_is_a_string_not_a_path,
        expected = Ok(vec![
            doc! {"$match": {"ratio": "0.10000000000000000001"}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_ratio=0.10000000000000000001",
    );

    #[test]
    fn decimals_are_not_lifted() {
        let pipeline = crate::compile("users", "a_price=1.0,cost=10.50&p_id")
            .expect("compile failed");
        assert_eq!(
            vec![
                doc! {"$addFields": {"price": 1.0, "cost": 10.5}},
                doc! {"$project": {"id": 1}},
                doc! {"$project": {"_id": 0}},
            ],
            pipeline.to_documents()
        );
    }
}

mod or_groups {
    use bson::doc;

    test_compile!(
        or_group_and_sibling,
        expected = Ok(vec![
            doc! {"$match": {"$or": [{"a": 1}, {"b": 2}], "c": 3}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_a=1|b=2,c=3",
    );

    test_compile!(
        or_group_after_sibling,
        expected = Ok(vec![
            doc! {"$match": {"status": "Paid", "$or": [{"a": 1}, {"a": 2}, {"a": 3}]}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_status=Paid,a=1|a=2|a=3",
    );

    test_compile!(
        second_or_group_is_anded,
        expected = Ok(vec![
            doc! {"$match": {
                "$or": [{"a": 1}, {"b": 2}],
                "$and": [{"$or": [{"c": 3}, {"d": 4}]}],
            }},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_a=1|b=2,c=3|d=4",
    );

    test_compile!(
        third_or_group_joins_the_and,
        expected = Ok(vec![
            doc! {"$match": {
                "$or": [{"a": 1}, {"b": 2}],
                "$and": [
                    {"$or": [{"c": 3}, {"d": 4}]},
                    {"$or": [{"e": 5}, {"f": 6}]},
                ],
            }},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_a=1|b=2,c=3|d=4,e=5|f=6",
    );

    test_compile!(
        or_alternatives_use_operators,
        expected = Ok(vec![
            doc! {"$match": {"$or": [{"id": {"$in": [1, 2]}}, {"owner": "$user_id"}]}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_id=in$1;2|owner=$user_id",
    );
}

mod operators {
    use crate::{
        coerce::RawValue,
        operators::{OperatorError, OperatorRegistry},
        options::CompileOptions,
        result::Error,
    };
    use bson::doc;

    test_compile!(
        in_operator_coerces_each_element,
        expected = Ok(vec![
            doc! {"$match": {"id": {"$in": [1, 2, 3]}}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_id=in$1;2;3",
    );

    test_compile!(
        in_operator_mixed_elements,
        expected = Ok(vec![
            doc! {"$match": {"status": {"$in": ["Pending", "1", 2, true]}}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_status=in$Pending;'1';2;true",
    );

    test_compile!(
        first_operator_in_add_fields,
        expected = Ok(vec![
            doc! {"$addFields": {"cover": {"$first": "$videos"}}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "a_cover=first$videos",
    );

    test_compile!(
        unknown_operator,
        expected = Err(Error::UnknownOperator("nin".to_string())),
        input = "m_id=nin$1;2",
    );

    test_compile!(
        failing_operator,
        expected = Err(Error::Operator {
            operator: "first".to_string(),
            source: OperatorError("`first` on `cover` needs a field name".to_string()),
        }),
        input = "a_cover=first$",
    );

    test_compile!(
        custom_operator,
        expected = Ok(vec![
            doc! {"$match": {"id": {"$nin": [4, 5]}}},
            doc! {"$project": {"_id": 0}},
        ]),
        input = "m_id=nin$4;5",
        options = CompileOptions::new("users").with_operators(
            OperatorRegistry::default().with_operator("nin", |arg, _| {
                Ok(RawValue::List(arg.split(';').map(RawValue::from).collect()))
            })
        ),
    );

    test_compile!(
        empty_registry_rejects_builtins,
        expected = Err(Error::UnknownOperator("in".to_string())),
        input = "m_id=in$1",
        options = CompileOptions::new("users").with_operators(OperatorRegistry::empty()),
    );
}

mod malformed {
    use crate::result::Error;
    use bson::doc;

    test_compile!(
        missing_value,
        expected = Err(Error::MalformedClause("a".to_string())),
        input = "m_a",
    );

    test_compile!(
        too_many_equals,
        expected = Err(Error::MalformedClause("a=1=2".to_string())),
        input = "m_a=1=2",
    );

    test_compile!(
        missing_key,
        expected = Err(Error::MalformedClause("=1".to_string())),
        input = "m_=1",
    );

    test_compile!(
        empty_alternative_is_not_dropped,
        expected = Err(Error::MalformedClause(String::new())),
        input = "m_a=1|",
    );

    test_compile!(
        bad_alternative_fails_the_group,
        expected = Err(Error::MalformedClause("b".to_string())),
        input = "m_a=1|b|c=3",
    );

    test_compile!(
        empty_match_emits_no_stage,
        expected = Ok(vec![doc! {"$project": {"_id": 0}}]),
        input = "m_",
    );

    test_compile!(
        empty_add_fields_emits_no_stage,
        expected = Ok(vec![doc! {"$project": {"_id": 0}}]),
        input = "a_,",
    );
}
