#[cfg(test)]
mod tests {
    use crate::{BoundaryScanner, ObjectQueue, ScannerOptions, StreamError};

    fn scan(fragments: &[&str]) -> Result<Vec<String>, StreamError> {
        scan_with(ScannerOptions::default(), fragments)
    }

    fn scan_with(options: ScannerOptions, fragments: &[&str]) -> Result<Vec<String>, StreamError> {
        let mut scanner = BoundaryScanner::with_options(options);
        let mut queue = ObjectQueue::new();
        for fragment in fragments {
            scanner.process_fragment(fragment, &mut queue)?;
        }
        let mut objects = Vec::new();
        while let Some(object) = queue.pop() {
            objects.push(object);
        }
        Ok(objects)
    }

    #[test]
    fn test_object_split_after_open_brace() {
        let objects = scan(&["[{", "\"a\":1}]"]).unwrap();
        assert_eq!(objects, vec!["{\"a\":1}"]);
    }

    #[test]
    fn test_brace_inside_string_across_fragments() {
        let objects = scan(&["[{\"x\":\"", "hi}there\"}]"]).unwrap();
        assert_eq!(objects, vec!["{\"x\":\"hi}there\"}"]);
    }

    #[test]
    fn test_two_objects_in_order() {
        let objects = scan(&["[{\"a\":1},", "{\"a\":2}]"]).unwrap();
        assert_eq!(objects, vec!["{\"a\":1}", "{\"a\":2}"]);
    }

    #[test]
    fn test_several_objects_closed_by_one_fragment() {
        let objects = scan(&["[{\"a\":1},{\"a\":2},{\"a\":3}]"]).unwrap();
        assert_eq!(objects.len(), 3);
        assert_eq!(objects[2], "{\"a\":3}");
    }

    #[test]
    fn test_no_output_before_closing_brace() {
        let mut scanner = BoundaryScanner::new();
        let mut queue = ObjectQueue::new();

        scanner.process_fragment("[{\"a\":{\"b\":", &mut queue).unwrap();
        assert!(queue.is_empty());
        assert_eq!(scanner.depth(), 3);

        scanner.process_fragment("2}", &mut queue).unwrap();
        assert!(queue.is_empty());

        scanner.process_fragment("}", &mut queue).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop().unwrap(), "{\"a\":{\"b\":2}}");
    }

    #[test]
    fn test_state_is_kept_between_fragments() {
        let mut scanner = BoundaryScanner::new();
        let mut queue = ObjectQueue::new();
        scanner.process_fragment("[{\"name\": \"a b", &mut queue).unwrap();

        let state = scanner.state();
        assert_eq!(state.depth, 2);
        assert!(state.in_string);
        assert_eq!(state.current_object, "{\"name\":\"a b");
    }

    #[test]
    fn test_not_an_array() {
        let err = scan(&["not an array"]).unwrap_err();
        match err {
            StreamError::Malformed { fragment } => assert_eq!(fragment, "not an array"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_top_level_object_is_rejected() {
        assert!(matches!(
            scan(&["{\"hello\": 0}"]),
            Err(StreamError::Malformed { .. })
        ));
    }

    #[test]
    fn test_leading_whitespace_before_array() {
        let objects = scan(&["\n  ", " [ {\"a\": 1} ]"]).unwrap();
        assert_eq!(objects, vec!["{\"a\":1}"]);
    }

    #[test]
    fn test_empty_fragments_are_ignored() {
        let objects = scan(&["", "[", "", "{\"a\":1}", "", "]", ""]).unwrap();
        assert_eq!(objects, vec!["{\"a\":1}"]);
    }

    #[test]
    fn test_content_after_array_is_rejected() {
        let mut scanner = BoundaryScanner::new();
        let mut queue = ObjectQueue::new();
        scanner.process_fragment("[{\"a\":1}]", &mut queue).unwrap();
        assert!(scanner.is_complete());
        scanner.process_fragment(" \n", &mut queue).unwrap();

        let err = scanner.process_fragment(", {}", &mut queue).unwrap_err();
        assert!(matches!(err, StreamError::Malformed { .. }));
    }

    #[test]
    fn test_objects_closed_before_an_error_stay_queued() {
        let mut scanner = BoundaryScanner::new();
        let mut queue = ObjectQueue::new();
        let err = scanner
            .process_fragment("[{\"a\":1},{\"a\":2}]x", &mut queue)
            .unwrap_err();
        assert!(matches!(err, StreamError::Malformed { .. }));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop().unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_unbalanced_close_brace() {
        assert!(matches!(scan(&["[}]"]), Err(StreamError::Malformed { .. })));
    }

    #[test]
    fn test_whitespace_is_kept_only_inside_strings() {
        let objects = scan(&["[ {\n  \"a\" : \"x y\tz\" ,\n  \"b\" : 2\n} ]"]).unwrap();
        assert_eq!(objects, vec!["{\"a\":\"x y\tz\",\"b\":2}"]);
    }

    #[test]
    fn test_brackets_and_braces_inside_strings() {
        let objects = scan(&["[{\"v\":\"a{b}c[d]e\"},{\"w\":\"]}\"}]"]).unwrap();
        assert_eq!(objects, vec!["{\"v\":\"a{b}c[d]e\"}", "{\"w\":\"]}\"}"]);
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        let objects = scan(&["[{\"t\":\"a\\", "\"}b\"},{\"u\":\"\\\\\"}]"]).unwrap();
        assert_eq!(objects, vec!["{\"t\":\"a\\\"}b\"}", "{\"u\":\"\\\\\"}"]);
    }

    #[test]
    fn test_legacy_quote_toggling() {
        let options = ScannerOptions {
            honor_escapes: false,
            ..Default::default()
        };
        let mut scanner = BoundaryScanner::with_options(options);
        let mut queue = ObjectQueue::new();
        scanner
            .process_fragment("[{\"t\":\"a\\\"}b\"}]", &mut queue)
            .unwrap();

        // The escaped quote ends the string, so the object closes early.
        assert_eq!(queue.pop().unwrap(), "{\"t\":\"a\\\"}");
        assert!(queue.is_empty());
        assert!(matches!(
            scanner.finish(),
            Err(StreamError::Truncated { depth: 1 })
        ));
    }

    #[test]
    fn test_nested_brackets_are_dropped_by_default() {
        let objects = scan(&["[{\"a\":[1,2],\"b\":{\"c\":[]}}]"]).unwrap();
        assert_eq!(objects, vec!["{\"a\":1,2,\"b\":{\"c\":}}"]);
    }

    #[test]
    fn test_nested_brackets_can_be_retained() {
        let options = ScannerOptions {
            retain_nested_brackets: true,
            ..Default::default()
        };
        let objects = scan_with(options, &["[{\"a\":[1,[2]],", "\"b\":{\"c\":[{}]}}]"]).unwrap();
        assert_eq!(objects, vec!["{\"a\":[1,[2]],\"b\":{\"c\":[{}]}}"]);
    }

    #[test]
    fn test_objects_inside_nested_arrays_do_not_split_the_element() {
        let objects = scan(&["[{\"items\":[{\"id\":1},{\"id\":2}]},{\"id\":3}]"]).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1], "{\"id\":3}");
    }

    #[test]
    fn test_finish_reports_truncation() {
        let mut scanner = BoundaryScanner::new();
        let mut queue = ObjectQueue::new();
        assert!(scanner.finish().is_ok());

        scanner.process_fragment("[{\"a\":1},{\"a\":", &mut queue).unwrap();
        assert!(matches!(
            scanner.finish(),
            Err(StreamError::Truncated { depth: 2 })
        ));

        scanner.process_fragment("2}]", &mut queue).unwrap();
        assert!(scanner.finish().is_ok());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_object_size_limit() {
        let options = ScannerOptions {
            max_object_size: Some(8),
            ..Default::default()
        };
        assert!(scan_with(options.clone(), &["[{\"a\":1}]"]).is_ok());
        assert!(matches!(
            scan_with(options, &["[{\"a\":\"0123456789\"}]"]),
            Err(StreamError::ObjectTooLarge { limit: 8 })
        ));
    }
}
