// Language registry
// Fixed table of languages the sandbox is expected to run, keyed by the
// sandbox's own language id.

use lazy_static::lazy_static;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageDescriptor {
    pub id: u32,
    pub display_name: &'static str,
    pub boilerplate: &'static str,
    pub comment_prefix: &'static str,
}

/// Registry of supported languages, in registration order
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: Vec<LanguageDescriptor>,
}

impl LanguageRegistry {
    fn from_table(languages: Vec<LanguageDescriptor>) -> Self {
        debug_assert!(
            languages
                .iter()
                .enumerate()
                .all(|(i, a)| languages[i + 1..].iter().all(|b| a.id != b.id)),
            "language ids must be unique"
        );
        Self { languages }
    }

    /// Look up a language by its sandbox id
    pub fn describe(&self, language_id: u32) -> Option<&LanguageDescriptor> {
        self.languages.iter().find(|lang| lang.id == language_id)
    }

    /// All languages in registration order
    pub fn list_all(&self) -> &[LanguageDescriptor] {
        &self.languages
    }

    /// First language whose display name contains `name`, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<&LanguageDescriptor> {
        let needle = name.to_lowercase();
        self.languages
            .iter()
            .find(|lang| lang.display_name.to_lowercase().contains(&needle))
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

lazy_static! {
    static ref REGISTRY: LanguageRegistry = LanguageRegistry::from_table(vec![
        LanguageDescriptor {
            id: 71,
            display_name: "Python 3.8.1",
            boilerplate: PYTHON3_BOILERPLATE,
            comment_prefix: "#",
        },
        LanguageDescriptor {
            id: 63,
            display_name: "JavaScript (Node.js 12.14.0)",
            boilerplate: JAVASCRIPT_BOILERPLATE,
            comment_prefix: "//",
        },
        LanguageDescriptor {
            id: 54,
            display_name: "C++ (GCC 9.2.0)",
            boilerplate: CPP_BOILERPLATE,
            comment_prefix: "//",
        },
        LanguageDescriptor {
            id: 50,
            display_name: "C (GCC 9.2.0)",
            boilerplate: C_BOILERPLATE,
            comment_prefix: "//",
        },
        LanguageDescriptor {
            id: 62,
            display_name: "Java (OpenJDK 13.0.1)",
            boilerplate: JAVA_BOILERPLATE,
            comment_prefix: "//",
        },
        LanguageDescriptor {
            id: 51,
            display_name: "C# (Mono 6.6.0.161)",
            boilerplate: CSHARP_BOILERPLATE,
            comment_prefix: "//",
        },
        LanguageDescriptor {
            id: 70,
            display_name: "Python 2.7.17",
            boilerplate: PYTHON2_BOILERPLATE,
            comment_prefix: "#",
        },
        LanguageDescriptor {
            id: 72,
            display_name: "Ruby (2.7.0)",
            boilerplate: RUBY_BOILERPLATE,
            comment_prefix: "#",
        },
        LanguageDescriptor {
            id: 73,
            display_name: "Rust (1.40.0)",
            boilerplate: RUST_BOILERPLATE,
            comment_prefix: "//",
        },
        LanguageDescriptor {
            id: 60,
            display_name: "Go (1.13.5)",
            boilerplate: GO_BOILERPLATE,
            comment_prefix: "//",
        },
    ]);
}

/// The process-wide registry
pub fn registry() -> &'static LanguageRegistry {
    &REGISTRY
}

pub fn describe(language_id: u32) -> Option<&'static LanguageDescriptor> {
    REGISTRY.describe(language_id)
}

pub fn list_all() -> &'static [LanguageDescriptor] {
    REGISTRY.list_all()
}

pub fn find_by_name(name: &str) -> Option<&'static LanguageDescriptor> {
    REGISTRY.find_by_name(name)
}

/// Display name for a language id, "Unknown" when it is not registered
pub fn display_name(language_id: u32) -> &'static str {
    describe(language_id)
        .map(|lang| lang.display_name)
        .unwrap_or("Unknown")
}

const PYTHON3_BOILERPLATE: &str = r#"# Write your solution here
def solution():
    # Your code here
    pass

# Test your solution
if __name__ == "__main__":
    result = solution()
    print(result)"#;

const JAVASCRIPT_BOILERPLATE: &str = r#"// Write your solution here
function solution() {
    // Your code here
}

// Test your solution
console.log(solution());"#;

const CPP_BOILERPLATE: &str = r#"#include <iostream>
#include <vector>
#include <string>
using namespace std;

// Write your solution here
int main() {
    // Your code here
    return 0;
}"#;

const C_BOILERPLATE: &str = r#"#include <stdio.h>
#include <stdlib.h>

// Write your solution here
int main() {
    // Your code here
    return 0;
}"#;

const JAVA_BOILERPLATE: &str = r#"public class Solution {
    // Write your solution here
    public static void main(String[] args) {
        // Your code here
    }
}"#;

const CSHARP_BOILERPLATE: &str = r#"using System;

public class Solution
{
    // Write your solution here
    public static void Main()
    {
        // Your code here
    }
}"#;

const PYTHON2_BOILERPLATE: &str = r#"# Write your solution here
def solution():
    # Your code here
    pass

# Test your solution
if __name__ == "__main__":
    result = solution()
    print result"#;

const RUBY_BOILERPLATE: &str = r#"# Write your solution here
def solution
    # Your code here
end

# Test your solution
puts solution"#;

const RUST_BOILERPLATE: &str = r#"// Write your solution here
fn main() {
    // Your code here
    println!("Hello, World!");
}"#;

const GO_BOILERPLATE: &str = r#"package main

import "fmt"

// Write your solution here
func main() {
    // Your code here
    fmt.Println("Hello, World!")
}"#;
