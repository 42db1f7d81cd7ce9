/// A canned problem statement the form can prefill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleProblem {
    pub title: &'static str,
    pub statement: &'static str,
}

pub const EXAMPLE_PROBLEMS: &[ExampleProblem] = &[
    ExampleProblem {
        title: "Two Sum",
        statement: "Given an array of integers nums and an integer target, return indices of the two numbers such that they add up to target. You may assume that each input would have exactly one solution, and you may not use the same element twice.",
    },
    ExampleProblem {
        title: "Reverse Linked List",
        statement: "Given the head of a singly linked list, reverse the list, and return the reversed list.",
    },
    ExampleProblem {
        title: "Valid Parentheses",
        statement: "Given a string s containing just the characters '(', ')', '{', '}', '[' and ']', determine if the input string is valid. An input string is valid if: Open brackets must be closed by the same type of brackets. Open brackets must be closed in the correct order.",
    },
    ExampleProblem {
        title: "Binary Search",
        statement: "Given an array of integers nums which is sorted in ascending order, and an integer target, write a function to search target in nums. If target exists, then return its index. Otherwise, return -1.",
    },
    ExampleProblem {
        title: "Merge Two Sorted Lists",
        statement: "You are given the heads of two sorted linked lists list1 and list2. Merge the two lists into one sorted list. The list should be made by splicing together the nodes of the first two lists. Return the head of the merged linked list.",
    },
    ExampleProblem {
        title: "Maximum Subarray",
        statement: "Given an integer array nums, find the subarray with the largest sum, and return its sum.",
    },
];
