// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The quiz a new store starts out with.

use crate::error::Fallible;
use crate::parser::parse_quiz_content;
use crate::types::quiz::Quiz;
use crate::types::quiz::QuizDraft;
use crate::types::timestamp::Timestamp;

pub const SAMPLE_TITLE: &str = "Đề thi mẫu: Rust cơ bản";

pub const SAMPLE_DESCRIPTION: &str = "Kiểm tra kiến thức cơ bản về ngôn ngữ Rust.";

pub const SAMPLE_TEXT: &str = "Câu 1: Rust quản lý bộ nhớ bằng cơ chế nào?
A. Bộ thu gom rác (garbage collector)
*B. Quyền sở hữu (ownership) và mượn (borrowing)
C. Đếm tham chiếu cho mọi giá trị

Câu 2: Từ khóa nào khai báo một biến có thể thay đổi?
A. let
*B. let mut
C. const
D. static

Câu 3: Những kiểu nào dưới đây là kiểu số nguyên?
*A. i32
B. f64
*C. u8
D. bool";

pub fn sample_quiz(created_at: Timestamp) -> Fallible<Quiz> {
    let draft = QuizDraft {
        title: SAMPLE_TITLE.to_string(),
        description: SAMPLE_DESCRIPTION.to_string(),
        password: None,
        shuffle_questions: false,
        questions: parse_quiz_content(SAMPLE_TEXT),
    };
    Quiz::new(draft, created_at)
}
