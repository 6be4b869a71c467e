//! The native library behind the bridge
//!
//! Plain Rust with no knowledge of the boundary. Everything here is
//! reached from managed code only through the `ffi` exports.

pub mod console;

use console::write_line;

/// Native object exposed to managed code as `TestClass`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestClass {
    i: i32,
}

impl TestClass {
    pub fn new() -> Self {
        Self { i: 0 }
    }

    pub fn print(&self) {
        write_line(&format!("TestClass: i = {}", self.i));
    }

    pub fn increment(&mut self) {
        self.i = self.i.wrapping_add(1);
    }

    pub fn add(&mut self, value: i32) {
        self.i = self.i.wrapping_add(value);
    }

    pub fn get(&self) -> i32 {
        self.i
    }
}

pub fn hello() {
    write_line("Hello from Rust!");
}

pub fn print_number(number: i32) {
    write_line(&format!("Number: {}", number));
}

pub fn add(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

pub fn concat(a: String, b: String) -> String {
    let mut joined = a;
    joined.push_str(&b);
    joined
}

pub fn concat_str(a: &str, b: &str) -> String {
    let mut joined = String::with_capacity(a.len() + b.len());
    joined.push_str(a);
    joined.push_str(b);
    joined
}

pub fn test_obj_by_value(obj: TestClass) {
    write_line(&format!("TestClass by value: i = {}", obj.get()));
}

pub fn print_vec_len(items: &[i32]) {
    write_line(&format!("Vec length: {}", items.len()));
}

pub fn get_vec() -> Vec<i32> {
    vec![1, 2, 3]
}

pub fn maybe_return_class(name: Option<String>) -> Option<TestClass> {
    name.map(|_| TestClass::new())
}

/// `None` in gives `None` out; `Some` wraps on overflow like `add`
pub fn maybe_add_one(value: Option<i32>) -> Option<i32> {
    value.map(|v| v.wrapping_add(1))
}
