use holeheap::{Heap, Scenario};

#[test]
fn reference_scenario() {
    let scenario = Scenario::default();
    let mut heap = Heap::with_config(&scenario.holes, scenario.config);

    let results: Vec<bool> = scenario
        .requests
        .iter()
        .map(|&request| heap.request_allocation(request))
        .collect();

    assert_eq!(results, vec![true, true, true, false, true]);
    assert_eq!(
        heap.layout(),
        vec![
            (1000, true),
            (170, false),
            (480, false),
            (210, false),
            (690, false),
            (2450, true),
            (300, true),
            (500, true),
            (800, true),
        ]
    );
    assert_eq!(heap.verify(), Ok(()));
}

#[test]
fn reference_scenario_rendering() {
    let scenario = Scenario::default();
    let mut heap = Heap::new(&scenario.holes);

    assert_eq!(
        heap.render(),
        " -> [free 1000] -> [free 4000] -> [free 300] -> [free 500] -> [free 800]"
    );

    for request in scenario.requests {
        heap.request_allocation(request);
    }

    let expected = " -> [free 1000] -> [alloc 170] -> [alloc 480] -> [alloc 210] \
                    -> [alloc 690] -> [free 2450] -> [free 300] -> [free 500] -> [free 800]";
    assert_eq!(heap.render(), expected);
    assert_eq!(heap.render(), expected);
}

#[test]
fn failed_request_in_scenario_keeps_chain() {
    let mut heap = Heap::new(&[1000, 4000, 300, 500, 800]);

    for request in [170, 480, 210] {
        assert!(heap.request_allocation(request));
    }

    let before = heap.layout();
    assert!(!heap.request_allocation(4180));
    assert_eq!(heap.layout(), before);

    let stats = heap.stats();
    assert_eq!(stats.largest_free, Some(3140));
    assert_eq!(stats.allocated_size, 170 + 480 + 210);
}

#[test]
fn scenario_from_arguments() {
    let args = ["--holes", "5,9,9,3", "--requests", "4,9,9"]
        .iter()
        .map(|arg| arg.to_string());
    let scenario = Scenario::from_args(args).unwrap();
    let mut heap = Heap::with_config(&scenario.holes, scenario.config);

    let results: Vec<bool> = scenario
        .requests
        .iter()
        .map(|&request| heap.request_allocation(request))
        .collect();

    // 4 splits the first 9, the next 9 takes the second one
    // whole, and nothing of size 9 is left.
    assert_eq!(results, vec![true, true, false]);
    assert_eq!(
        heap.layout(),
        vec![(5, true), (4, false), (5, true), (9, false), (3, true)]
    );
}
