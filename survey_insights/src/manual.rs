/*!

This is the long-form manual for `survey_insights` and `survey_explorer`.

## Input tables

Three tables are read. Each of them can be an Excel workbook (`xlsx`) or a CSV file (`csv`).

### Questions

One row per question. Both columns are mandatory.

```text
Question_ID,Question_Text
Q1,Is a hot dog a sandwich?
Q8,Is curry a soup?
```

The prompts replace the built-in ones. A question id that is not one of `Q1` to `Q10` is
still accepted: its answers are shown as the raw codes.

### Numeric data

One row per respondent, with the answers to the closed questions as option codes
(`1` is the first option). Code `2` for `Q1` is `No`. Codes that are not an option of the
question are ignored.

```text
GENDER,REGION,EDUCATION,HHINCOME,ETHNICITYROLL23,PMARITALSTATUS,AGE,Q1,Q2
2,QC,6,3,2,2,34,1,2
```

All the columns are optional.

### Text data

The same demographic columns, and the free-text answers in `Q8_text` and `Q9_text`.

## Demographic values

The demographic columns accept the numeric codes of the questionnaire, the short codes
(`QC` for Quebec), the long questionnaire wordings for education, and the canonical
labels. All of them are turned into the canonical label. Values that are not known are
kept as they are.

Education, income and age group are ordinal: charts and groups follow their natural order
(`Under $25,000` before `Over $200,000`) rather than the alphabetical order.

The age group is computed from the `AGE` column. The groups include their upper bound:
`18` is in `Under 18`, `24` is in `18-24`. Every age above 74 is in `75+`.

## Classification of free-text answers

Each answer to `Q8` (is curry a soup) and `Q9` (is a folded pizza a sandwich) gets one of
`Yes`, `No`, `It depends` or `Ambiguous`. Empty cells and cells that are not text are not
classified, and they are not counted.

The classifier works on the lower-cased text:
1. direct answers such as `yes`, `sure`, `nope` or `never`. If only one side is found, it wins.
2. phrases specific to the question such as `not a soup` or `technically a sandwich`.
   If only one side is found, it wins.
3. `depends` anywhere in the text gives `It depends`.
4. keywords of the question. For `Q8`, `stew`, `sauce` and `dish` are checked before
   `liquid`, `broth` and `bowl`. For `Q9`, `bread`, `filling` and `between` are checked
   before `still pizza`, `just pizza` and `not bread`.
5. otherwise, the side with the most matching patterns wins. A tie is `Ambiguous`.

The answers are classified once, when the tables are loaded.

## Configuration

Without any configuration, `survey_explorer` reads `Questions.xlsx`, `Chat Data Numeric.xlsx`
and `Chat Data Text.xlsx` from the current directory. A JSON configuration can point to
other files:

```text
{
  "outputSettings": {
    "title": "Sandwich survey",
    "outputPath": "view.json"
  },
  "questionsSource": { "provider": "csv", "filePath": "questions.csv" },
  "numericSource": { "provider": "xlsx", "filePath": "numeric.xlsx", "excelWorksheetName": "Sheet1" },
  "textSource": { "provider": "csv", "filePath": "text.csv" }
}
```

- `provider`: `xlsx` or `csv`
- `filePath`: relative to the directory of the configuration file
- `excelWorksheetName` (optional): for workbooks with more than one worksheet

 */
